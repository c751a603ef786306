//! Core data model: the canonical recording request, its weekly cadence,
//! and the scheduled-session record reported back by the site.

pub mod cadence;
pub mod recording;
pub mod session;

pub use cadence::{align_to_cadence, InvalidCadence, Weekdays};
pub use recording::{Recording, Recurrence, ValidityCode};
pub use session::{ScheduledSession, SessionRow};
