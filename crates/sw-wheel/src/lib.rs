//! # sw-wheel: Two-stage spin wheel for SweetSpin
//!
//! A round spins a category wheel, reveals the category, then spins that
//! category's item wheel and reports the final pair to a result sink.
//!
//! ## Architecture
//!
//! ```text
//! SharedCategories ──snapshot──▶ StageMachine ──result_ready──▶ ResultSink
//!                                   │
//!                                   ├── DegreeSource (offset in [0, 360))
//!                                   ├── WheelConfig / TimingConfig
//!                                   └── broadcast<StageEvent>
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod machine;
pub mod resolve;
pub mod sink;
pub mod timing;

pub use catalog::*;
pub use config::*;
pub use error::*;
pub use machine::*;
pub use resolve::*;
pub use sink::*;
pub use timing::*;

pub use sw_stage::{SpinStage, StageEvent, WheelEvent, WheelKind};
