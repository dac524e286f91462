use std::{fmt::Display, ops::Deref};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Percentage(f64);

impl Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0.round())
    }
}

impl Percentage {
    pub fn new_opt(value: f64) -> Option<Percentage> {
        if value < 0. || !value.is_finite() {
            None
        } else {
            Some(Percentage(value))
        }
    }

    pub fn rounded(&self) -> u32 {
        self.0.round() as u32
    }
}

impl Deref for Percentage {
    type Target = f64;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Share of `part` in `whole`. An empty whole yields 0% instead of NaN.
pub fn ratio_percentage(part: u32, whole: u32) -> Percentage {
    if whole == 0 {
        return Percentage::default();
    }
    Percentage::new_opt(part as f64 / whole as f64 * 100.).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::ratio_percentage;

    #[test]
    fn zero_whole_is_zero() {
        assert_eq!(*ratio_percentage(3, 0), 0.);
        assert_eq!(ratio_percentage(1, 3).rounded(), 33);
        assert_eq!(ratio_percentage(4, 4).rounded(), 100);
    }
}
