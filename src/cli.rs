//! Command-line front end. Each invocation loads the store from its scripts,
//! runs one operation, prints the result, and optionally dumps the store back
//! to disk so changes outlive the in-memory database.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use crate::config::{default_export_path, StoreConfig};
use crate::db::BookStore;
use crate::models::{render_books, BookField, BookFilter, NewBook};

/// Manage a small catalog of books held in an in-memory SQLite table.
#[derive(Parser, Debug)]
#[command(name = "book-catalog", version, about, long_about = None)]
pub struct Cli {
    /// Script that creates the BOOKS table.
    #[arg(long, global = true, value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Script that seeds the table (an earlier export works too).
    #[arg(long, global = true, value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Export the store to this file after the command succeeds.
    #[arg(long, global = true, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every book.
    List,
    /// Print books whose field equals the value exactly.
    Find {
        #[arg(value_enum)]
        field: FieldArg,
        value: String,
    },
    /// Insert a new book.
    Add(BookArgs),
    /// Replace every field of an existing book. Leaving out --synopsis clears it.
    Update(BookArgs),
    /// Delete a book by id.
    Delete { id: i64 },
    /// Run raw SQL against the store. Nothing is filtered; use with care.
    Query { sql: String },
    /// Dump the store as INSERT statements.
    Export {
        /// Destination file; defaults to ~/.book-catalog/books.sql.
        path: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct BookArgs {
    pub id: i64,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub author: String,
    #[arg(long)]
    pub publisher: String,
    #[arg(long)]
    pub year: i64,
    #[arg(long)]
    pub synopsis: Option<String>,
}

impl BookArgs {
    fn as_new_book(&self) -> NewBook<'_> {
        NewBook {
            id: self.id,
            title: self.title.trim(),
            author: self.author.trim(),
            publisher: self.publisher.trim(),
            publication_year: self.year,
            synopsis: self.synopsis.as_deref().map(str::trim),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum FieldArg {
    Title,
    Author,
    Publisher,
    Year,
}

impl From<FieldArg> for BookField {
    fn from(field: FieldArg) -> Self {
        match field {
            FieldArg::Title => BookField::Title,
            FieldArg::Author => BookField::Author,
            FieldArg::Publisher => BookField::Publisher,
            FieldArg::Year => BookField::Year,
        }
    }
}

/// Load the store, run the requested command, and print its output.
pub fn run(cli: Cli) -> Result<()> {
    let config = StoreConfig::with_paths(cli.schema, cli.data);
    let mut store = BookStore::new(&config);
    store.initialize(&config.data_path).with_context(|| {
        format!(
            "failed to load books from {} and {}",
            store.schema_path().display(),
            config.data_path.display()
        )
    })?;
    info!(data = %config.data_path.display(), "book store loaded");

    let output = execute(&mut store, cli.command)?;
    print!("{output}");

    if let Some(path) = cli.save {
        let count = store
            .export_to(&path)
            .with_context(|| format!("failed to save books to {}", path.display()))?;
        info!(path = %path.display(), count, "book store saved");
    }
    Ok(())
}

/// Run one command against an open store and return the text to print.
pub fn execute(store: &mut BookStore, command: Command) -> Result<String> {
    let output = match command {
        Command::List => render_books(&store.all_books().context("failed to list books")?),
        Command::Find { field, value } => {
            let filter = BookFilter::parse(field.into(), &value)?;
            render_books(&store.find_by_field(&filter).context("failed to search books")?)
        }
        Command::Add(args) => {
            store
                .add_book(&args.as_new_book())
                .context("failed to add book")?;
            format!("Added book {}\n", args.id)
        }
        Command::Update(args) => {
            let updated = store
                .update_book(&args.as_new_book())
                .context("failed to update book")?;
            if updated == 0 {
                warn!(id = args.id, "no book with this id; nothing updated");
            }
            format!("Updated {updated} book(s)\n")
        }
        Command::Delete { id } => {
            let deleted = store.delete_book(id).context("failed to delete book")?;
            if deleted == 0 {
                warn!(id, "no book with this id; nothing deleted");
            }
            format!("Deleted {deleted} book(s)\n")
        }
        Command::Query { sql } => store
            .raw_query(&sql)
            .context("failed to run query")?
            .render(),
        Command::Export { path } => {
            let path = match path {
                Some(path) => path,
                None => default_export_path()?,
            };
            let count = store
                .export_to(&path)
                .with_context(|| format!("failed to export books to {}", path.display()))?;
            format!("Exported {count} book(s) to {}\n", path.display())
        }
    };
    Ok(output)
}
