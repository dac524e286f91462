use chrono::{Local, NaiveDate};

/// Represents an entity responsible for providing the current date across the application. Every
/// "today"-relative view goes through it so tests can pin the date.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Sync + Send + 'static {
    fn today(&self) -> NaiveDate;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
