use super::TrioError;
use std::{fmt, str::FromStr};

/// Closed integer interval `[begin, end]` of plausible repeat counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub begin: u32,
    pub end: u32,
}

impl Interval {
    pub fn new(begin: u32, end: u32) -> Result<Self, TrioError> {
        if begin > end {
            return Err(TrioError::invalid_input(format!(
                "interval begin {} > end {}",
                begin, end
            )));
        }
        Ok(Self { begin, end })
    }

    pub fn width(&self) -> u32 {
        self.end - self.begin
    }

    /// Touching endpoints count as overlapping.
    pub fn overlaps(&self, other: &Interval) -> bool {
        !(self.end < other.begin || other.end < self.begin)
    }

    /// Gap between the two intervals, 0 when they overlap.
    pub fn distance(&self, other: &Interval) -> u32 {
        if self.end < other.begin {
            other.begin - self.end
        } else if other.end < self.begin {
            self.begin - other.end
        } else {
            0
        }
    }
}

impl FromStr for Interval {
    type Err = TrioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || TrioError::invalid_input(format!("expected 'begin-end', found '{}'", s));
        let (begin, end) = s.trim().split_once('-').ok_or_else(error)?;
        let begin = begin.trim().parse().map_err(|_| error())?;
        let end = end.trim().parse().map_err(|_| error())?;
        Self::new(begin, end)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.begin, self.end)
    }
}
