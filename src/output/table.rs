//! Text rendering of the catalog table and its page controls.

use colored::Colorize;

use crate::catalog::Book;
use crate::paginator::{PageControl, Paginator};

use super::{format_date, format_price};

const TITLE_WIDTH: usize = 40;
const AUTHOR_WIDTH: usize = 24;
const GENRE_WIDTH: usize = 16;

const HEADERS: [&str; 7] = ["ID", "Title", "Author", "Published", "Genre", "Price", "ISBN"];

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn row_cells(book: &Book) -> [String; 7] {
    [
        book.id.to_string(),
        truncate(&book.title, TITLE_WIDTH),
        truncate(&book.author, AUTHOR_WIDTH),
        format_date(book.published_date),
        truncate(book.genre.as_deref().unwrap_or("-"), GENRE_WIDTH),
        format_price(book.price),
        book.isbn.clone(),
    ]
}

fn pad(value: &str, width: usize) -> String {
    let len = value.chars().count();
    format!("{value}{}", " ".repeat(width.saturating_sub(len)))
}

pub fn render_table<'a, I>(books: I) -> String
where
    I: IntoIterator<Item = &'a Book>,
{
    let rows: Vec<[String; 7]> = books.into_iter().map(row_cells).collect();
    if rows.is_empty() {
        return format!("{}\n", "No books found".dimmed());
    }

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header = HEADERS
        .iter()
        .zip(widths.iter())
        .map(|(h, w)| pad(h, *w))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(&format!("{}\n", header.trim_end().bold()));
    let rule_len = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    out.push_str(&"─".repeat(rule_len));
    out.push('\n');

    for row in &rows {
        let line = row
            .iter()
            .zip(widths.iter())
            .map(|(cell, w)| pad(cell, *w))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Vertical field listing for a single record.
pub fn render_book(book: &Book) -> String {
    let fields = [
        ("ID", book.id.to_string()),
        ("Title", book.title.clone()),
        ("Author", book.author.clone()),
        ("Published", format_date(book.published_date)),
        ("Genre", book.genre.clone().unwrap_or_else(|| "-".to_string())),
        ("Price", format_price(book.price)),
        ("ISBN", book.isbn.clone()),
    ];
    let mut out = String::new();
    for (label, value) in fields {
        out.push_str(&format!("{:<10} {}\n", format!("{label}:").bold(), value));
    }
    out
}

/// One line of navigation controls; empty when there is at most one page.
pub fn render_page_controls(paginator: &Paginator) -> String {
    paginator
        .compute_window()
        .controls()
        .into_iter()
        .map(|control| match control {
            PageControl::Previous { enabled } => {
                if enabled {
                    "‹".bold().to_string()
                } else {
                    "‹".dimmed().to_string()
                }
            }
            PageControl::Next { enabled } => {
                if enabled {
                    "›".bold().to_string()
                } else {
                    "›".dimmed().to_string()
                }
            }
            PageControl::Page { index, current } => {
                let label = (index + 1).to_string();
                if current {
                    format!("[{label}]").bold().cyan().to_string()
                } else {
                    label
                }
            }
            PageControl::Ellipsis => "...".dimmed().to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_page_info(paginator: &Paginator) -> String {
    format!(
        "Page {} of {} ({} books)",
        paginator.current_page() + 1,
        paginator.total_pages().max(1),
        paginator.total_elements()
    )
}
