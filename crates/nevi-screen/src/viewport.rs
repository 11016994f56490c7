//! Viewport sizing policy
//!
//! Turns logical viewport pixel sizes into grid dimensions and debounces
//! rapid changes so at most one resize request reaches the editor per
//! quiescent period. The request itself is an outbound `(cols, rows)`
//! signal; forwarding it over RPC belongs to the process-lifecycle
//! collaborator.

use nevi_render::CellMetrics;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;

/// Delay before a viewport change becomes a resize request; reset by every
/// further change inside the window.
pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(10);

/// Maps viewport pixels to grid dimensions and dedupes unchanged results.
#[derive(Debug, Clone)]
pub struct ViewportPolicy {
    metrics: CellMetrics,
    last: Option<(u16, u16)>,
}

impl ViewportPolicy {
    pub fn new(metrics: CellMetrics) -> Self {
        Self {
            metrics,
            last: None,
        }
    }

    /// Grid size for a viewport: floor division by the logical cell size,
    /// never below 1x1.
    pub fn grid_size(&self, width_px: u32, height_px: u32) -> (u16, u16) {
        (
            self.metrics.cols_for(width_px),
            self.metrics.rows_for(height_px),
        )
    }

    /// Record a viewport size; returns the grid size only when it differs
    /// from the last observed one.
    pub fn observe(&mut self, width_px: u32, height_px: u32) -> Option<(u16, u16)> {
        let grid = self.grid_size(width_px, height_px);
        if self.last == Some(grid) {
            return None;
        }
        self.last = Some(grid);
        Some(grid)
    }
}

/// Debounced resize requester.
///
/// Feed it every viewport size change; after `delay` of quiet it emits at
/// most one `(cols, rows)` request for the last pending size. Dropping the
/// handle flushes any pending request and stops the task.
pub struct ResizeDebouncer {
    tx: mpsc::UnboundedSender<(u32, u32)>,
}

impl ResizeDebouncer {
    pub fn spawn(
        mut policy: ViewportPolicy,
        delay: Duration,
        out: mpsc::UnboundedSender<(u16, u16)>,
    ) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<(u32, u32)>();
        tokio::spawn(async move {
            while let Some(mut pending) = rx.recv().await {
                loop {
                    tokio::select! {
                        next = rx.recv() => match next {
                            // A newer size resets the quiescence timer.
                            Some(size) => pending = size,
                            None => {
                                emit(&mut policy, pending, &out);
                                return;
                            }
                        },
                        _ = tokio::time::sleep(delay) => {
                            emit(&mut policy, pending, &out);
                            break;
                        }
                    }
                }
            }
        });
        Self { tx }
    }

    /// Report a viewport size change. Returns false once the task is gone.
    pub fn viewport_changed(&self, width_px: u32, height_px: u32) -> bool {
        self.tx.send((width_px, height_px)).is_ok()
    }
}

fn emit(
    policy: &mut ViewportPolicy,
    (width_px, height_px): (u32, u32),
    out: &mpsc::UnboundedSender<(u16, u16)>,
) {
    if let Some((cols, rows)) = policy.observe(width_px, height_px) {
        debug!(cols, rows, "requesting grid resize");
        let _ = out.send((cols, rows));
    }
}
