use rusqlite::types::ToSql;
use rusqlite::{ffi, params, Error as SqlError, Row};

use super::BookStore;
use crate::error::{Result, StoreError};
use crate::models::{Book, BookFilter, NewBook};

/// Column list shared by every query that hydrates a `Book`.
pub(crate) const BOOK_COLUMNS: &str = "ID, TITLE, AUTHOR, PUBLISHER, PUBLICATION_YEAR, SYNOPSIS";

/// Map a row selected with `BOOK_COLUMNS` into a `Book`.
pub(crate) fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        publisher: row.get(3)?,
        publication_year: row.get(4)?,
        synopsis: row.get(5)?,
    })
}

impl BookStore {
    /// Insert a new book. The synopsis is stored exactly as given. A clash on
    /// the id is reported as `DuplicateId` and leaves the existing row alone.
    pub fn add_book(&mut self, book: &NewBook<'_>) -> Result<()> {
        self.connection()?
            .execute(
                "INSERT INTO BOOKS (ID, TITLE, AUTHOR, PUBLISHER, PUBLICATION_YEAR, SYNOPSIS)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    book.id,
                    book.title,
                    book.author,
                    book.publisher,
                    book.publication_year,
                    book.synopsis
                ],
            )
            .map_err(|err| map_primary_key(err, book.id))?;
        Ok(())
    }

    /// Replace every field but the id. An empty synopsis clears it. Returns
    /// the number of rows touched; zero means the id was not present, which is
    /// not treated as a failure.
    pub fn update_book(&mut self, book: &NewBook<'_>) -> Result<usize> {
        let updated = self.connection()?.execute(
            "UPDATE BOOKS
             SET TITLE = ?1, AUTHOR = ?2, PUBLISHER = ?3, PUBLICATION_YEAR = ?4, SYNOPSIS = ?5
             WHERE ID = ?6",
            params![
                book.title,
                book.author,
                book.publisher,
                book.publication_year,
                book.normalized_synopsis(),
                book.id
            ],
        )?;
        Ok(updated)
    }

    /// Remove the book with `id`. Like update, a missing id affects zero rows
    /// and still succeeds.
    pub fn delete_book(&mut self, id: i64) -> Result<usize> {
        let deleted = self
            .connection()?
            .execute("DELETE FROM BOOKS WHERE ID = ?1", params![id])?;
        Ok(deleted)
    }

    /// Exact-match search on a single column. Rows come back in whatever order
    /// the engine yields them.
    pub fn find_by_field(&self, filter: &BookFilter) -> Result<Vec<Book>> {
        let sql = format!(
            "SELECT {BOOK_COLUMNS} FROM BOOKS WHERE {} = ?1",
            filter.field().column()
        );
        let value: &dyn ToSql = match filter {
            BookFilter::Title(text) | BookFilter::Author(text) | BookFilter::Publisher(text) => text,
            BookFilter::Year(year) => year,
        };

        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql)?;
        let books = stmt
            .query_map(params![value], book_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(books)
    }

    /// Every book in the store, unordered.
    pub fn all_books(&self) -> Result<Vec<Book>> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&format!("SELECT {BOOK_COLUMNS} FROM BOOKS"))?;
        let books = stmt
            .query_map([], book_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(books)
    }
}

/// Split primary-key clashes out of the generic statement failures. Other
/// constraint violations (a missing title, say) stay `Statement` errors.
fn map_primary_key(err: SqlError, id: i64) -> StoreError {
    let is_primary_key = err
        .sqlite_error()
        .is_some_and(|code| code.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY);
    if is_primary_key {
        StoreError::DuplicateId(id)
    } else {
        StoreError::Statement(err)
    }
}
