use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use super::BookStore;
use crate::error::{Result, StoreError};
use crate::models::Book;

impl BookStore {
    /// Dump every book to `path` as one `INSERT` per line, creating parent
    /// directories first. The output reloads through `initialize` against the
    /// same schema. Writing is not atomic: a failure part-way leaves a
    /// truncated file behind.
    pub fn export_to(&self, path: &Path) -> Result<usize> {
        let books = self.all_books()?;
        write_dump(path, &books).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), books = books.len(), "exported book store");
        Ok(books.len())
    }
}

fn write_dump(path: &Path, books: &[Book]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = BufWriter::new(File::create(path)?);
    for book in books {
        writeln!(writer, "{}", insert_statement(book))?;
    }
    writer.flush()
}

/// Render one book as a reloadable `INSERT`. Books without a synopsis leave the
/// column out entirely instead of writing `NULL`.
pub(crate) fn insert_statement(book: &Book) -> String {
    let title = quote(&book.title);
    let author = quote(&book.author);
    let publisher = quote(&book.publisher);

    match &book.synopsis {
        Some(synopsis) => format!(
            "INSERT INTO BOOKS (ID, TITLE, AUTHOR, PUBLISHER, PUBLICATION_YEAR, SYNOPSIS) VALUES ({}, {title}, {author}, {publisher}, {}, {});",
            book.id,
            book.publication_year,
            quote(synopsis)
        ),
        None => format!(
            "INSERT INTO BOOKS (ID, TITLE, AUTHOR, PUBLISHER, PUBLICATION_YEAR) VALUES ({}, {title}, {author}, {publisher}, {});",
            book.id, book.publication_year
        ),
    }
}

/// SQL string literal with embedded single quotes doubled.
fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}
