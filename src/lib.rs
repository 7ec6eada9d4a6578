//! # Moonlight Core Library
//!
//! This library computes the Moon's phase for a calendar date and hands the result to
//! whatever presents it: a 3D viewer, a watch face, or the text summary shipped with
//! the `moonlight` binary.
//!
//! ## Design Philosophy
//!
//! ### One Pure Calculation
//! - **Date in, age out**: [`lunar::compute_lunar_age`] maps a calendar date to the
//!   number of days since the last new moon. No clock, no globals, no I/O.
//! - **Whole calendar days**: only the day difference from the 1970-08-01 reference
//!   matters, so time of day and time zone are normalised away before the math runs
//!   (see [`lunar::DayBoundary`], UTC by default).
//! - **Euclidean wrap**: dates before the reference still land inside the cycle.
//!
//! ### Explicit State
//! The "currently selected date" lives in a single [`timeline::Timeline`] owned by the
//! application. Presentation layers receive readings through the
//! [`timeline::PhaseObserver`] boundary instead of sharing a mutable view model.
//!
//! ### Data Flow
//! 1. **Input**: CLI flag or config → [`lunar::parse_calendar_date`] → `NaiveDate`
//! 2. **Compute**: [`lunar::LunarPhaseCalculator::reading`] → [`MoonReading`]
//! 3. **Present**: [`renderer`] formats text, or the reading is emitted as JSON
//!
//! ## Core Types
//!
//! - [`MoonReading`]: everything a consumer needs for one date
//! - [`lunar::LunarAge`], [`lunar::MoonDay`], [`lunar::PhaseSymbol`]: the calculation's
//!   continuous and discrete outputs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Module declarations
pub mod config;
pub mod lunar;
pub mod renderer;
pub mod timeline;

use lunar::{LunarAge, PhaseSymbol};

/// Moon phase for one calendar date.
///
/// Recomputed on every query; nothing here is cached or persisted. The raw
/// `age_days` is exposed so consumers can apply their own visual transforms.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use moonlight_lib::lunar::{LunarPhaseCalculator, PhaseSymbol};
///
/// let calculator = LunarPhaseCalculator::default();
/// let reading = calculator.reading(NaiveDate::from_ymd_opt(1970, 8, 1).unwrap());
///
/// assert_eq!(reading.moon_day, 1);
/// assert_eq!(reading.phase, PhaseSymbol::NewMoon);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoonReading {
    /// Calendar date the reading was computed for
    pub date: NaiveDate,
    /// Days since the most recent new moon, `0.0..29.53`
    pub age_days: f64,
    /// Ceiling of the age, 1 to 30
    pub moon_day: u8,
    /// Display category for `moon_day`
    pub phase: PhaseSymbol,
}

impl MoonReading {
    pub fn new(date: NaiveDate, age: LunarAge) -> Self {
        MoonReading {
            date,
            age_days: age.days(),
            moon_day: age.moon_day().get(),
            phase: age.phase_symbol(),
        }
    }

    /// Light-source rotation in radians for a renderer shading a sphere.
    pub fn light_rotation(&self) -> f64 {
        lunar::light_rotation(self.age_days)
    }

    pub fn illuminated_fraction(&self) -> f64 {
        lunar::illuminated_fraction(self.age_days)
    }
}
