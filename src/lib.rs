//! # capture-scheduler
//!
//! Bulk scheduler for classroom lecture-capture recordings.
//!
//! The crate ingests recording-schedule requests from several
//! institution-specific tabular formats, normalizes them into one canonical
//! model, validates each entry, detects conflicts among entries sharing a
//! recorder, and reconciles the outcomes of submitting them to the remote
//! site.
//!
//! ## Architecture
//!
//! - [`models`]: the canonical recording request, weekly cadence, and
//!   validity codes
//! - [`parser`]: format detection, per-format row normalization, and
//!   directory resolution
//! - [`directory`]: traits for the site's recorder directory, folder
//!   directory, and scheduling service, plus an in-memory double
//! - [`scheduler`]: conflict detection, submission, and result
//!   reconciliation
//! - [`report`]: run reports and the success output file
//! - [`config`]: TOML run configuration
//!
//! The pipeline is single-threaded and sequential; external calls are
//! awaited one at a time and failures are recorded per line, never thrown
//! across the batch.

pub mod config;
pub mod directory;
pub mod models;
pub mod parser;
pub mod report;
pub mod scheduler;

pub use config::SchedulerConfig;
pub use models::{Recording, Recurrence, ValidityCode, Weekdays};
pub use parser::{parse_file, parse_reader, ParseOptions, ParseOutput};
pub use scheduler::{schedule_recordings, split_results, ScheduleResults};
