pub mod table;

use std::time::Duration;

use chrono::NaiveDate;
use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::catalog::{Book, BookPage};

pub use table::{render_book, render_page_controls, render_page_info, render_table};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" | "table" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageRecord<'a> {
    page: usize,
    total_pages: usize,
    total_elements: u64,
    books: &'a [Book],
}

pub fn render_json(page: &BookPage, current_page: usize) -> serde_json::Result<Vec<u8>> {
    let record = PageRecord {
        page: current_page,
        total_pages: page.total_pages,
        total_elements: page.total_elements,
        books: &page.content,
    };
    serde_json::to_vec_pretty(&record)
}

/// `Mon D, YYYY`, taken from the calendar date without any timezone shift.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn format_price(price: Decimal) -> String {
    let mut rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    format!("${rounded}")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
    Info,
}

/// A transient, non-fatal message for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    fn icon(&self) -> ColoredString {
        match self.level {
            NoticeLevel::Success => "✔".bold().green(),
            NoticeLevel::Error => "✖".bold().red(),
            NoticeLevel::Warning => "⚠".bold().yellow(),
            NoticeLevel::Info => "ℹ".bold().blue(),
        }
    }

    pub fn render(&self) -> String {
        let message = match self.level {
            NoticeLevel::Error => self.message.red(),
            NoticeLevel::Warning => self.message.yellow(),
            _ => self.message.normal(),
        };
        format!("{} {}", self.icon(), message)
    }

    pub fn emit(&self) {
        eprintln!("{}", self.render());
    }
}

/// Spinner shown while a request is outstanding. Cleared on drop.
pub struct Loading {
    bar: Option<ProgressBar>,
}

impl Loading {
    pub fn start(enabled: bool, message: &str) -> Self {
        if !enabled {
            return Self { bar: None };
        }
        let bar = ProgressBar::new_spinner();
        bar.set_draw_target(ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }
}

impl Drop for Loading {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn dates_use_short_us_format() {
        let date = NaiveDate::from_ymd_opt(1965, 8, 1).unwrap();
        assert_eq!(format_date(date), "Aug 1, 1965");
        let date = NaiveDate::from_ymd_opt(2020, 12, 31).unwrap();
        assert_eq!(format_date(date), "Dec 31, 2020");
    }

    #[test]
    fn prices_have_two_decimals() {
        assert_eq!(format_price(dec!(12.5)), "$12.50");
        assert_eq!(format_price(dec!(7)), "$7.00");
        assert_eq!(format_price(dec!(0.125)), "$0.13");
    }

    #[test]
    fn notice_render_contains_message() {
        colored::control::set_override(false);
        let notice = Notice::success("Book created successfully!");
        assert_eq!(notice.render(), "✔ Book created successfully!");
        assert_eq!(Notice::error("x").level, NoticeLevel::Error);
    }

    #[test]
    fn output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("table"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("xml"), None);
    }

    #[test]
    fn json_output_includes_totals() {
        let page = BookPage {
            content: vec![],
            total_pages: 0,
            total_elements: 0,
        };
        let value: serde_json::Value = serde_json::from_slice(&render_json(&page, 0).unwrap()).unwrap();
        assert_eq!(value["totalPages"], 0);
        assert_eq!(value["books"], serde_json::json!([]));
    }

    #[test]
    fn disabled_spinner_is_inert() {
        let loading = Loading::start(false, "Loading books");
        assert!(loading.bar.is_none());
    }
}
