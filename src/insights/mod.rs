//! Pure aggregation of a [History](crate::history::entities::History) into what the insights view
//! renders. Nothing here does I/O or mutates the history, so every function can be re-run on a
//! new snapshot at any time. [cache::InsightsCache] avoids recomputing for an unchanged snapshot.

pub mod cache;
pub mod grid;
pub mod pie;
pub mod series;
pub mod stats;
