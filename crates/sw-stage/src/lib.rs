//! # sw-stage: SweetSpin Stage System
//!
//! Defines the canonical phases a two-wheel round passes through and the
//! events emitted while moving between them.
//!
//! ## Flow
//!
//! ```text
//! AwaitingCategorySpin ──spin──▶ CategoryRevealed ──advance──▶ AwaitingItemSpin
//!          ▲                                                          │
//!          └──────────────── reset ◀── ResultRevealed ◀────spin───────┘
//! ```

pub mod event;
pub mod stage;
pub mod trace;

pub use event::*;
pub use stage::*;
pub use trace::*;
