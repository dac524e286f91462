//!  History is organized through [repository::HistoryRepository].
//!  The basic idea is:
//!   - Every recorded day is a [entities::DailyRecord] keyed by its date.
//!   - Records are written whole, last write wins, and are never deleted.
//!   - Whatever is on disk is normalized at load time, see [normalize].

pub mod entities;
pub mod normalize;
pub mod repository;
