//! Day tracker with a GitHub style activity calendar. Each day keeps a list of tasks, the
//! completion of which rolls up into a green, blue or red day. The insights are computed from a
//! plain history snapshot and shown straight in the terminal.
//!

pub mod cli;
pub mod history;
pub mod insights;
pub mod tracker;
pub mod utils;
