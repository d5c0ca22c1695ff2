pub mod form;

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use form::{validate_isbn, BookForm, FieldError, FormErrors};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub published_date: NaiveDate,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub isbn: String,
}

/// Request body for create and update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub published_date: NaiveDate,
    pub genre: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub isbn: String,
}

impl From<&Book> for BookDraft {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            published_date: book.published_date,
            genre: book.genre.clone(),
            price: book.price,
            isbn: book.isbn.clone(),
        }
    }
}

/// One page of the paged book listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPage {
    pub content: Vec<Book>,
    pub total_pages: usize,
    pub total_elements: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    Title,
    Author,
    PublishedDate,
    Genre,
    Price,
    Isbn,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::Id,
        SortField::Title,
        SortField::Author,
        SortField::PublishedDate,
        SortField::Genre,
        SortField::Price,
        SortField::Isbn,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "id" => Some(Self::Id),
            "title" => Some(Self::Title),
            "author" => Some(Self::Author),
            "publisheddate" | "published-date" | "published_date" | "published" | "date" => {
                Some(Self::PublishedDate)
            }
            "genre" => Some(Self::Genre),
            "price" => Some(Self::Price),
            "isbn" => Some(Self::Isbn),
            _ => None,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Author => "author",
            Self::PublishedDate => "publishedDate",
            Self::Genre => "genre",
            Self::Price => "price",
            Self::Isbn => "isbn",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortDir {
    Asc,
    Desc,
}

impl SortDir {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Parameters that determine which result set the page index refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogQuery {
    pub size: u32,
    pub sort_by: SortField,
    pub sort_dir: SortDir,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            size: DEFAULT_PAGE_SIZE,
            sort_by: SortField::Title,
            sort_dir: SortDir::Desc,
        }
    }
}

impl CatalogQuery {
    pub fn to_params(&self, page: usize) -> Vec<(&'static str, String)> {
        vec![
            ("page", page.to_string()),
            ("size", self.size.to_string()),
            ("sortBy", self.sort_by.as_param().to_string()),
            ("sortDir", self.sort_dir.as_param().to_string()),
        ]
    }
}
