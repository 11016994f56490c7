//! Redraw batch fixtures
//!
//! Builders for the `(name, args)` command tuples a redraw notification
//! carries, in the exact wire shape: each command's args is a list of
//! per-invocation parameter lists.

use serde_json::{json, Value};

/// One command tuple as decoded from a `redraw` notification.
pub type CommandTuple = (String, Vec<Value>);

pub fn cmd(name: &str, args: Vec<Value>) -> CommandTuple {
    (name.to_string(), args)
}

/// `put` with one cell per character of `text`.
pub fn put_str(text: &str) -> CommandTuple {
    cmd(
        "put",
        text.chars().map(|c| json!([c.to_string()])).collect(),
    )
}

pub fn cursor_goto(row: u16, col: u16) -> CommandTuple {
    cmd("cursor_goto", vec![json!([row, col])])
}

pub fn clear() -> CommandTuple {
    cmd("clear", vec![])
}

pub fn eol_clear() -> CommandTuple {
    cmd("eol_clear", vec![])
}

pub fn highlight_set(attrs: Value) -> CommandTuple {
    cmd("highlight_set", vec![json!([attrs])])
}

pub fn update_fg(color: i64) -> CommandTuple {
    cmd("update_fg", vec![json!([color])])
}

pub fn update_bg(color: i64) -> CommandTuple {
    cmd("update_bg", vec![json!([color])])
}

pub fn update_sp(color: i64) -> CommandTuple {
    cmd("update_sp", vec![json!([color])])
}

pub fn set_scroll_region(top: u16, bottom: u16, left: u16, right: u16) -> CommandTuple {
    cmd("set_scroll_region", vec![json!([top, bottom, left, right])])
}

pub fn scroll(count: i64) -> CommandTuple {
    cmd("scroll", vec![json!([count])])
}

pub fn resize(cols: u16, rows: u16) -> CommandTuple {
    cmd("resize", vec![json!([cols, rows])])
}
