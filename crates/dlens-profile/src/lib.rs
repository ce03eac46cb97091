//! dlens-profile
//!
//! The Data Profiler: turns a parsed [`dlens_ingest::Table`] into a
//! [`summary::DataSummary`] and a ranked list of [`insight::Insight`]s.
//!
//! Both entry points are pure functions of their input.  The profiler never
//! fails on a well-formed table: empty input yields a zero-valued summary
//! and an empty insight list, not an error.
//!
//! Tables whose headers look like daily OHLCV stock exports are routed to a
//! specialised generator (see [`stock`]); everything else goes through the
//! generic descriptive path in [`insight`].

pub mod insight;
pub mod stats;
pub mod stock;
pub mod summary;

pub use insight::{generate_insights, Confidence, Insight, InsightKind, InsightValue};
pub use summary::{summarize, ColumnType, DataSummary};
