//! # tally-engine
//!
//! The billing-period reconciliation engine.
//!
//! Each pass walks the live current period plus eleven future ones; per
//! period it aggregates tagged payment amounts from the calendar and
//! replaces the single "Total Remaining" summary event at the
//! policy-determined placement date. The scheduler repeats passes on a tick
//! measured from pass completion.
//!
//! - [`aggregate`]: tagged range query + decimal summation
//! - [`reconcile`]: placement date, global purge, fresh insert
//! - [`window`]: the 12-period pass
//! - [`scheduler`]: the forever loop
//!
//! Store failures abort the pass and surface as [`EngineError`]; the
//! scheduler logs them and tries again next tick.

#![deny(unsafe_code)]

pub mod aggregate;
pub mod config;
pub mod errors;
pub mod reconcile;
pub mod scheduler;
pub mod window;

pub use aggregate::total_for;
pub use config::EngineConfig;
pub use errors::{EngineError, EngineResult};
pub use reconcile::{placement_date, reconcile};
pub use scheduler::run;
pub use window::{FUTURE_PERIODS, PassSummary, ReconciledPeriod, run_once};

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
