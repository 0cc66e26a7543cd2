//! Statistics helpers for the evolutionary driver and the head-to-head
//! evaluation mode.
//!
//! - [`fitness`] - per-generation fitness summaries (mean, extremes, and
//!   which individuals achieved the maximum)
//! - [`timeseries`] - columnwise averaging of per-tick instrumentation rows
//!   across independent trials

pub mod fitness;
pub mod timeseries;
