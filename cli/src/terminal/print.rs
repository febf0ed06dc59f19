use std::cell::Cell;
use std::fmt::Display;

use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;
pub const PRINT_TARGET: &str = "bidgate::print";

thread_local! {
    pub static GLOBAL_KEY_WIDTH: Cell<usize> = const { Cell::new(0) }
}

pub trait WithDefaultColor {
    fn with_default(self, default_color: Color) -> ColoredString;
}

impl WithDefaultColor for &str {
    fn with_default(self, default_color: Color) -> ColoredString {
        self.color(default_color)
    }
}

impl WithDefaultColor for ColoredString {
    fn with_default(self, _default_color: Color) -> ColoredString {
        self
    }
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg.to_uppercase());
    let msg_len: usize = UnicodeWidthStr::width(formatted.as_str());

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let output: String = format!(
        "{}{}{}",
        "═".repeat(left).color(colors::SEPARATOR),
        formatted.color(colors::PRIMARY).bold(),
        "═".repeat(right).color(colors::SEPARATOR)
    );
    print(&output);
}

pub fn separator() {
    print(&format!("{}", "─".repeat(TOTAL_WIDTH).color(colors::SEPARATOR)));
}

/// Sets the column width used by [`aligned_with_key`] for the next block.
pub fn set_key_width<'a, I>(keys: I)
where
    I: IntoIterator<Item = &'a str>,
{
    let width = keys.into_iter().map(UnicodeWidthStr::width).max().unwrap_or(0);
    GLOBAL_KEY_WIDTH.set(width);
}

pub fn aligned_with_key<V>(key: &str, value: V)
where
    V: Display + WithDefaultColor,
{
    let whitespace: String =
        ".".repeat((GLOBAL_KEY_WIDTH.get() + 1).saturating_sub(UnicodeWidthStr::width(key)));
    let colon: String = format!(
        "{}{}",
        whitespace.color(colors::SEPARATOR),
        ":".color(colors::SEPARATOR)
    );
    let value: ColoredString = value.with_default(colors::TEXT_DEFAULT);
    print_status(format!("{}{} {}", key.color(colors::PRIMARY), colon, value));
}

pub fn print_status<T: AsRef<str>>(msg: T) {
    let prefix: ColoredString = ">".color(colors::SEPARATOR);
    let message: String = format!("{} {}", prefix, msg.as_ref().color(colors::TEXT_DEFAULT));
    print(&message);
}

pub fn as_tree_one_level(key_value_pair: Vec<(String, ColoredString)>) {
    let width = key_value_pair
        .iter()
        .map(|(key, _)| UnicodeWidthStr::width(key.as_str()))
        .max()
        .unwrap_or(0);

    for (i, (key, value)) in key_value_pair.iter().enumerate() {
        let last: bool = i + 1 == key_value_pair.len();
        let branch: ColoredString = if !last {
            "├─".bright_black()
        } else {
            "└─".bright_black()
        };
        let output: String = format!(
            " {} {}{}{} {}",
            branch,
            key.color(colors::TEXT_DEFAULT),
            ".".repeat(width - UnicodeWidthStr::width(key.as_str())).color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value
        );
        print(&output);
    }
}

pub fn verdict(label: &str, color: Color, detail: &str) {
    separator();
    print(&format!("{} {}", label.color(color).bold(), detail.color(colors::TEXT_DEFAULT)));
}

pub fn tree_head(name: &str) {
    let output: String = format!("{} {}", "◆".color(colors::ACCENT), name.color(colors::PRIMARY));
    print(&output);
}
