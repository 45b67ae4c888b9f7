use rusqlite::types::Value;
use rusqlite::ErrorCode;

use super::BookStore;
use crate::error::{Result, StoreError};
use crate::models::{render_books, Book};

/// What a raw statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RawOutcome {
    /// The statement yields result columns (a `SELECT`, most `PRAGMA`s).
    Rows(QueryTable),
    /// The statement yields no columns; carries the affected-row count.
    Affected(usize),
}

impl RawOutcome {
    pub fn render(&self) -> String {
        match self {
            RawOutcome::Rows(table) => table.render(),
            RawOutcome::Affected(count) => format!("Affected rows: {count}\n"),
        }
    }
}

/// Untyped result rows, kept in engine order.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl QueryTable {
    /// Read the rows back as books when the result carries all six `BOOKS`
    /// columns (matched by name, any order, case-insensitive) with compatible
    /// values. Returns `None` otherwise. Columns beyond those six are
    /// ignored, so they do not show up in the rendered books.
    pub fn books(&self) -> Option<Vec<Book>> {
        let index = |name: &str| {
            self.columns
                .iter()
                .position(|column| column.eq_ignore_ascii_case(name))
        };
        let id = index("ID")?;
        let title = index("TITLE")?;
        let author = index("AUTHOR")?;
        let publisher = index("PUBLISHER")?;
        let year = index("PUBLICATION_YEAR")?;
        let synopsis = index("SYNOPSIS")?;

        self.rows
            .iter()
            .map(|row| {
                Some(Book {
                    id: integer(&row[id])?,
                    title: text(&row[title])?,
                    author: text(&row[author])?,
                    publisher: text(&row[publisher])?,
                    publication_year: integer(&row[year])?,
                    synopsis: match &row[synopsis] {
                        Value::Null => None,
                        other => Some(text(other)?),
                    },
                })
            })
            .collect()
    }

    /// Book-shaped results render like the fixed queries; anything else falls
    /// back to `COLUMN: value` pairs, one row per line.
    pub fn render(&self) -> String {
        if let Some(books) = self.books() {
            return render_books(&books);
        }
        self.rows
            .iter()
            .map(|row| {
                let cells: Vec<String> = self
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(column, value)| format!("{column}: {}", display_value(value)))
                    .collect();
                format!("{}\n", cells.join(", "))
            })
            .collect()
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(number) => Some(*number),
        _ => None,
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::Text(text) => Some(text.clone()),
        _ => None,
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Integer(number) => number.to_string(),
        Value::Real(number) => number.to_string(),
        Value::Text(text) => text.clone(),
        Value::Blob(bytes) => format!("<{} bytes>", bytes.len()),
    }
}

/// SQLite hands back no statement for blank or comment-only text, which
/// rusqlite reports as API misuse.
fn map_empty_statement(err: rusqlite::Error) -> StoreError {
    if err.sqlite_error_code() == Some(ErrorCode::ApiMisuse) {
        StoreError::Validation("query contains no SQL statement".to_string())
    } else {
        StoreError::Statement(err)
    }
}

impl BookStore {
    /// Run caller-supplied SQL verbatim.
    ///
    /// This is a trusted escape hatch for a single-user catalog: there is no
    /// sanitizing and no restriction on statement type, so DDL and destructive
    /// DML go straight through. Never route untrusted input here; the typed
    /// operations exist for that. Exactly one statement is accepted per call;
    /// blank or comment-only text is a `Validation` error.
    pub fn raw_query(&mut self, sql: &str) -> Result<RawOutcome> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(sql).map_err(map_empty_statement)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        if columns.is_empty() {
            let affected = stmt.execute([])?;
            return Ok(RawOutcome::Affected(affected));
        }

        let width = columns.len();
        let rows = stmt
            .query_map([], |row| {
                (0..width)
                    .map(|idx| row.get::<_, Value>(idx))
                    .collect::<rusqlite::Result<Vec<_>>>()
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(RawOutcome::Rows(QueryTable { columns, rows }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::seeded_store;

    const SEED: &str = "INSERT INTO BOOKS VALUES (1, 'Dune', 'Herbert', 'Ace', 1965, NULL);
                        INSERT INTO BOOKS VALUES (2, 'Emma', 'Austen', 'Murray', 1815, 'matchmaking');";

    #[test]
    fn select_star_renders_like_fixed_queries() {
        let (mut store, _dir) = seed();
        let outcome = store
            .raw_query("SELECT * FROM BOOKS WHERE PUBLICATION_YEAR < 1900")
            .unwrap();

        let RawOutcome::Rows(table) = &outcome else {
            panic!("expected rows, got {outcome:?}");
        };
        let books = table.books().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].title, "Emma");
        assert_eq!(outcome.render(), format!("{}\n", books[0]));
    }

    #[test]
    fn partial_columns_fall_back_to_generic_rows() {
        let (mut store, _dir) = seed();
        let outcome = store
            .raw_query("SELECT TITLE, SYNOPSIS FROM BOOKS WHERE ID = 1")
            .unwrap();

        let RawOutcome::Rows(table) = &outcome else {
            panic!("expected rows, got {outcome:?}");
        };
        assert!(table.books().is_none());
        assert_eq!(outcome.render(), "TITLE: Dune, SYNOPSIS: null\n");
    }

    #[test]
    fn destructive_statements_are_allowed() {
        let (mut store, _dir) = seed();
        let outcome = store.raw_query("DELETE FROM BOOKS WHERE ID = 1").unwrap();
        assert_eq!(outcome, RawOutcome::Affected(1));
        assert_eq!(outcome.render(), "Affected rows: 1\n");

        store.raw_query("DROP TABLE BOOKS").unwrap();
        assert!(matches!(store.all_books(), Err(StoreError::Statement(_))));
    }

    #[test]
    fn invalid_sql_is_a_statement_error() {
        let (mut store, _dir) = seed();
        let err = store.raw_query("SELEC nonsense").unwrap_err();
        assert!(matches!(err, StoreError::Statement(_)));
    }

    #[test]
    fn blank_or_comment_only_sql_is_a_validation_error() {
        let (mut store, _dir) = seed();
        for sql in ["", "   ", "-- just a comment"] {
            let err = store.raw_query(sql).unwrap_err();
            assert!(
                matches!(err, StoreError::Validation(ref msg) if msg.contains("no SQL statement")),
                "unexpected error for {sql:?}: {err:?}"
            );
        }
        assert_eq!(store.all_books().unwrap().len(), 2);
    }

    #[test]
    fn extra_columns_are_dropped_from_book_rendering() {
        let (mut store, _dir) = seed();
        let outcome = store
            .raw_query("SELECT *, 'extra' AS NOTE FROM BOOKS WHERE ID = 1")
            .unwrap();

        let RawOutcome::Rows(table) = &outcome else {
            panic!("expected rows, got {outcome:?}");
        };
        assert_eq!(table.columns.len(), 7);
        assert_eq!(
            outcome.render(),
            "ID: 1, Title: Dune, Author: Herbert, Publisher: Ace, Year: 1965, Synopsis: null\n"
        );
    }

    fn seed() -> (BookStore, tempfile::TempDir) {
        seeded_store(SEED)
    }
}
