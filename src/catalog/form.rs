//! Client-side validation of the add/edit book form.
//!
//! The rules mirror the server's field constraints so obvious mistakes are
//! caught before a round trip. The server remains the authority.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

use super::{Book, BookDraft};

pub const TITLE_MAX_CHARS: usize = 100;
pub const AUTHOR_MAX_CHARS: usize = 50;
pub const GENRE_MAX_CHARS: usize = 50;
pub const PRICE_MAX_INTEGER_DIGITS: usize = 10;
pub const PRICE_MAX_FRACTION_DIGITS: u32 = 2;

// `\d` would also accept non-ASCII digits.
static ISBN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]{10}|[0-9]{13})$").expect("valid ISBN regex"));

pub const ISBN_MESSAGE: &str = "ISBN must be exactly 10 or 13 digits (no hyphens or spaces)";

pub fn validate_isbn(isbn: &str) -> bool {
    ISBN_RE.is_match(isbn.trim())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{}", join_messages(.errors))]
pub struct FormErrors {
    pub errors: Vec<FieldError>,
}

fn join_messages(errors: &[FieldError]) -> String {
    errors.iter().map(|e| e.message.as_str()).join(", ")
}

impl FormErrors {
    pub fn fields(&self) -> Vec<&'static str> {
        self.errors.iter().map(|e| e.field).collect()
    }
}

/// Raw text as typed by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub published_date: String,
    pub genre: String,
    pub price: String,
    pub isbn: String,
}

impl BookForm {
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            published_date: book.published_date.format("%Y-%m-%d").to_string(),
            genre: book.genre.clone().unwrap_or_default(),
            price: book.price.normalize().to_string(),
            isbn: book.isbn.clone(),
        }
    }

    pub fn validate(&self) -> Result<BookDraft, FormErrors> {
        let mut errors = Vec::new();
        let mut fail = |field: &'static str, message: &str| {
            errors.push(FieldError {
                field,
                message: message.to_string(),
            })
        };

        let title = self.title.trim();
        if title.is_empty() {
            fail("title", "Title is required");
        } else if title.chars().count() > TITLE_MAX_CHARS {
            fail("title", "Title must be between 1 and 100 characters");
        }

        let author = self.author.trim();
        if author.is_empty() {
            fail("author", "Author is required");
        } else if author.chars().count() > AUTHOR_MAX_CHARS {
            fail("author", "Author must be between 1 and 50 characters");
        }

        let published_date = match self.published_date.trim() {
            "" => {
                fail("publishedDate", "Published date is required");
                None
            }
            raw => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    fail("publishedDate", "Published date must be in YYYY-MM-DD format");
                    None
                }
            },
        };

        let genre = self.genre.trim();
        if genre.chars().count() > GENRE_MAX_CHARS {
            fail("genre", "Genre must not exceed 50 characters");
        }

        let price = match parse_price(&self.price) {
            Ok(price) => Some(price),
            Err(message) => {
                fail("price", message);
                None
            }
        };

        let isbn = self.isbn.trim();
        if isbn.is_empty() {
            fail("isbn", "ISBN is required");
        } else if !validate_isbn(isbn) {
            fail("isbn", ISBN_MESSAGE);
        }

        match (published_date, price) {
            (Some(published_date), Some(price)) if errors.is_empty() => Ok(BookDraft {
                title: title.to_string(),
                author: author.to_string(),
                published_date,
                genre: (!genre.is_empty()).then(|| genre.to_string()),
                price,
                isbn: isbn.to_string(),
            }),
            _ => Err(FormErrors { errors }),
        }
    }
}

fn parse_price(raw: &str) -> Result<Decimal, &'static str> {
    let raw = raw.trim().trim_start_matches('$');
    if raw.is_empty() {
        return Err("Price is required");
    }
    let price = Decimal::from_str(raw).map_err(|_| "Price must be a number")?;
    if price <= Decimal::ZERO {
        return Err("Price must be greater than 0");
    }
    if price.normalize().scale() > PRICE_MAX_FRACTION_DIGITS {
        return Err("Price must have at most 2 decimal places");
    }
    if price.trunc().abs().to_string().len() > PRICE_MAX_INTEGER_DIGITS {
        return Err("Price must have at most 10 integer digits");
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid_form() -> BookForm {
        BookForm {
            title: "  The Left Hand of Darkness ".to_string(),
            author: "Ursula K. Le Guin".to_string(),
            published_date: "1969-03-01".to_string(),
            genre: "   ".to_string(),
            price: "9.99".to_string(),
            isbn: " 9780441478125 ".to_string(),
        }
    }

    #[test]
    fn isbn_accepts_ten_or_thirteen_ascii_digits() {
        assert!(validate_isbn("0441478123"));
        assert!(validate_isbn("9780441478125"));
        assert!(validate_isbn(" 9780441478125 "));
    }

    #[test]
    fn isbn_rejects_other_shapes() {
        for bad in [
            "",
            "044147812",
            "04414781234",
            "978-0441478125",
            "978 044147812",
            "044147812X",
            "٠١٢٣٤٥٦٧٨٩",
        ] {
            assert!(!validate_isbn(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn valid_form_yields_trimmed_draft() {
        let draft = valid_form().validate().unwrap();
        assert_eq!(draft.title, "The Left Hand of Darkness");
        assert_eq!(draft.genre, None);
        assert_eq!(draft.price, dec!(9.99));
        assert_eq!(draft.isbn, "9780441478125");
    }

    #[test]
    fn reports_every_failing_field() {
        let form = BookForm {
            title: String::new(),
            author: "x".repeat(51),
            published_date: "03/01/1969".to_string(),
            genre: "g".repeat(51),
            price: "0".to_string(),
            isbn: "978-0441478125".to_string(),
        };
        let err = form.validate().unwrap_err();
        assert_eq!(
            err.fields(),
            vec!["title", "author", "publishedDate", "genre", "price", "isbn"]
        );
    }

    #[test]
    fn price_rules() {
        assert_eq!(parse_price("$12.50"), Ok(dec!(12.50)));
        assert_eq!(parse_price("12.500"), Ok(dec!(12.5)));
        assert_eq!(parse_price("12.505"), Err("Price must have at most 2 decimal places"));
        assert_eq!(parse_price("-1"), Err("Price must be greater than 0"));
        assert_eq!(parse_price("abc"), Err("Price must be a number"));
        assert_eq!(parse_price("12345678901"), Err("Price must have at most 10 integer digits"));
    }

    #[test]
    fn form_from_book_keeps_exact_values() {
        let book = Book {
            id: 3,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            published_date: NaiveDate::from_ymd_opt(1965, 8, 1).unwrap(),
            genre: None,
            price: dec!(12.50),
            isbn: "9780441013593".to_string(),
        };
        let form = BookForm::from_book(&book);
        assert_eq!(form.published_date, "1965-08-01");
        assert_eq!(form.price, "12.5");
        assert_eq!(form.genre, "");
        assert_eq!(form.validate().unwrap(), BookDraft::from(&book));
    }

    #[test]
    fn error_display_joins_messages() {
        let form = BookForm {
            isbn: "123".to_string(),
            ..valid_form()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.to_string(), ISBN_MESSAGE);
    }
}
