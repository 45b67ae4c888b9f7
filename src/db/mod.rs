//! Persistence layer split across logical submodules. Every operation is a
//! single statement against the store's one in-memory connection.

mod books;
mod connection;
mod export;
mod query;

pub use connection::BookStore;
pub use query::{QueryTable, RawOutcome};
