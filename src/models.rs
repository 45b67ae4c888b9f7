//! Domain models that mirror the `BOOKS` table and get passed between the
//! store and its callers. These stay light-weight data holders; formatting
//! helpers live here so every caller renders a book the same way.

use std::fmt;

use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// A single row of the `BOOKS` table.
pub struct Book {
    /// Caller-supplied primary key.
    pub id: i64,
    pub title: String,
    pub author: String,
    pub publisher: String,
    /// Stored as-is; the catalog does not police the range.
    pub publication_year: i64,
    /// `None` maps to SQL `NULL`, which is distinct from an empty string.
    pub synopsis: Option<String>,
}

impl Book {
    /// Join the fields with `;` in column order. Fields are not escaped, so a
    /// value containing `;` cannot be split back apart reliably; pass `Book`
    /// values around instead of parsing this string.
    pub fn list_item(&self) -> String {
        format!(
            "{};{};{};{};{};{}",
            self.id,
            self.title,
            self.author,
            self.publisher,
            self.publication_year,
            self.synopsis_text()
        )
    }

    /// Text shown for the synopsis in rendered output. A missing synopsis
    /// prints as `null` so it stays distinguishable from an empty one.
    fn synopsis_text(&self) -> &str {
        self.synopsis.as_deref().unwrap_or("null")
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Title: {}, Author: {}, Publisher: {}, Year: {}, Synopsis: {}",
            self.id,
            self.title,
            self.author,
            self.publisher,
            self.publication_year,
            self.synopsis_text()
        )
    }
}

/// Render one book per line, each line terminated by `\n`.
pub fn render_books(books: &[Book]) -> String {
    books.iter().map(|book| format!("{book}\n")).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Input for the add and update operations. Borrowing keeps callers from
/// cloning form input just to hand it to the store.
pub struct NewBook<'a> {
    pub id: i64,
    pub title: &'a str,
    pub author: &'a str,
    pub publisher: &'a str,
    pub publication_year: i64,
    pub synopsis: Option<&'a str>,
}

impl NewBook<'_> {
    /// Synopsis as the update path stores it: an empty string means "no
    /// synopsis" and becomes `NULL`.
    pub(crate) fn normalized_synopsis(&self) -> Option<&str> {
        self.synopsis.filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Columns that support equality search.
pub enum BookField {
    Title,
    Author,
    Publisher,
    Year,
}

impl BookField {
    /// Column name in the `BOOKS` table.
    pub fn column(self) -> &'static str {
        match self {
            BookField::Title => "TITLE",
            BookField::Author => "AUTHOR",
            BookField::Publisher => "PUBLISHER",
            BookField::Year => "PUBLICATION_YEAR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A typed equality filter. Text comparisons are exact: no trimming, no case
/// folding, no partial matches.
pub enum BookFilter {
    Title(String),
    Author(String),
    Publisher(String),
    Year(i64),
}

impl BookFilter {
    /// Build a filter from raw caller input. Only the year needs parsing, and
    /// a bad number is reported as a validation failure.
    pub fn parse(field: BookField, raw: &str) -> Result<Self> {
        Ok(match field {
            BookField::Title => BookFilter::Title(raw.to_string()),
            BookField::Author => BookFilter::Author(raw.to_string()),
            BookField::Publisher => BookFilter::Publisher(raw.to_string()),
            BookField::Year => {
                let year = raw.trim().parse::<i64>().map_err(|_| {
                    StoreError::Validation(format!("year must be a whole number, got '{raw}'"))
                })?;
                BookFilter::Year(year)
            }
        })
    }

    pub fn field(&self) -> BookField {
        match self {
            BookFilter::Title(_) => BookField::Title,
            BookFilter::Author(_) => BookField::Author,
            BookFilter::Publisher(_) => BookField::Publisher,
            BookFilter::Year(_) => BookField::Year,
        }
    }
}
