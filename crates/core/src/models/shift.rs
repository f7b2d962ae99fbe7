//! Daily shift bands

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One of the eight fixed teaching bands of a school day.
///
/// Serialized as its band index (`0..=7`), which is what the API sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Shift {
    Shift1 = 0,
    Shift2 = 1,
    Shift3 = 2,
    Shift4 = 3,
    Shift5 = 4,
    Shift6 = 5,
    Shift7 = 6,
    Shift8 = 7,
}

/// Number of shift bands in a day
pub const SHIFT_COUNT: usize = 8;

impl Shift {
    /// All bands in chronological order
    pub fn all() -> &'static [Shift; SHIFT_COUNT] {
        &[
            Shift::Shift1,
            Shift::Shift2,
            Shift::Shift3,
            Shift::Shift4,
            Shift::Shift5,
            Shift::Shift6,
            Shift::Shift7,
            Shift::Shift8,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Start and end of the band as (hour, minute) pairs
    fn bounds(self) -> ((u32, u32), (u32, u32)) {
        match self {
            Shift::Shift1 => ((7, 0), (8, 30)),
            Shift::Shift2 => ((8, 45), (10, 15)),
            Shift::Shift3 => ((10, 30), (12, 0)),
            Shift::Shift4 => ((12, 30), (14, 0)),
            Shift::Shift5 => ((14, 15), (15, 45)),
            Shift::Shift6 => ((16, 0), (17, 30)),
            Shift::Shift7 => ((17, 45), (19, 15)),
            Shift::Shift8 => ((19, 30), (21, 0)),
        }
    }

    pub fn start_time(self) -> NaiveTime {
        let ((h, m), _) = self.bounds();
        NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default()
    }

    pub fn end_time(self) -> NaiveTime {
        let (_, (h, m)) = self.bounds();
        NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default()
    }

    /// Human-readable band, e.g. `07:00 - 08:30`
    pub fn label(self) -> String {
        format!(
            "{} - {}",
            self.start_time().format("%H:%M"),
            self.end_time().format("%H:%M")
        )
    }
}

impl TryFrom<u8> for Shift {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Shift::all()
            .get(value as usize)
            .copied()
            .ok_or_else(|| Error::InvalidValue(format!("shift index {} out of range", value)))
    }
}

impl From<Shift> for u8 {
    fn from(shift: Shift) -> Self {
        shift as u8
    }
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
