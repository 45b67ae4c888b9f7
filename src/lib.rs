//! Core library surface for the book catalog.
//!
//! The persistence layer (`db`) is the heart of the crate; `cli` is one thin
//! caller that drives it from the command line. Other front ends can depend on
//! the same pieces.
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod models;

/// The store handle and the shapes raw queries come back in.
pub use db::{BookStore, QueryTable, RawOutcome};

pub use config::StoreConfig;
pub use error::{Result, StoreError};

/// Domain types that other layers manipulate.
pub use models::{render_books, Book, BookField, BookFilter, NewBook};
