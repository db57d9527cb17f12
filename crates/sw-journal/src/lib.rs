//! # sw-journal: SweetSpin persistence
//!
//! Accounts, per-player catalogs and result history, all kept as JSON
//! strings in a [`KeyValueStore`]. [`JournalSink`] connects the store to
//! the stage machine so that every finished round lands in the player's
//! history with a rendered result card.

pub mod accounts;
pub mod catalog;
pub mod error;
pub mod history;
pub mod keys;
pub mod render;
pub mod sink;
pub mod store;

pub use accounts::*;
pub use catalog::*;
pub use error::*;
pub use history::*;
pub use render::*;
pub use sink::*;
pub use store::*;
