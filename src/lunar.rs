//! Moon-phase ("moon age") calculation on a fixed synodic period
//!
//! The age of the Moon is the number of days elapsed since the most recent
//! new moon. It is derived from whole calendar days counted from a reference
//! new moon on 1970-08-01, wrapped on the mean synodic month of 2 551 443 s.
//! Accuracy: this is a mean-period approximation, good to about a day; it is
//! not an ephemeris.

use crate::MoonReading;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// Mean synodic month (new moon to new moon) in seconds, ≈ 29.530588 days.
pub const LUNAR_MONTH_SECONDS: i64 = 2_551_443;

/// Seconds per civil day.
pub const DAY_SECONDS: i64 = 86_400;

/// Phase age of the reference epoch itself, in seconds.
pub const DAY_OFFSET: i64 = 12_300;

/// Synodic month expressed in days.
pub const SYNODIC_MONTH_DAYS: f64 = LUNAR_MONTH_SECONDS as f64 / DAY_SECONDS as f64;

/// Days from 0001-01-01 (CE day 1) to the reference epoch 1970-08-01.
const EPOCH_DAYS_FROM_CE: i64 = 719_375;

/// Age at which the light rotation is zero (light faces the viewer).
const LIGHT_PIVOT_DAYS: f64 = 14.5;

/// Light rotation per day of age, in radians.
const LIGHT_RADIANS_PER_DAY: f64 = 0.21;

/// Accepted textual date layouts, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Errors raised by the moon-phase core.
///
/// Only malformed input can fail; the arithmetic itself is total.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LunarError {
    /// Date text could not be parsed or names an impossible day
    #[error("invalid date {input:?}: {reason}")]
    InvalidInput { input: String, reason: String },

    /// Moon day index outside 1..=30
    #[error("moon day must be within 1..=30, got {day}")]
    MoonDayOutOfRange { day: u32 },

    /// Shifting the selected date left chrono's representable range
    #[error("date shifted by {days} days is out of range")]
    DateOutOfRange { days: i64 },

    /// Day boundary offset is a full day or more away from UTC
    #[error("day boundary offset must be within ±1439 minutes, got {minutes}")]
    InvalidDayBoundary { minutes: i32 },
}

impl LunarError {
    fn invalid_input(input: &str, reason: impl Into<String>) -> Self {
        LunarError::InvalidInput {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Days since the most recent new moon, in `[0, SYNODIC_MONTH_DAYS)`.
///
/// `0` is new moon, values near `SYNODIC_MONTH_DAYS / 2` are full moon.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct LunarAge(f64);

impl LunarAge {
    fn from_remainder_seconds(remainder: i64) -> Self {
        LunarAge(remainder as f64 / DAY_SECONDS as f64)
    }

    /// Age in days as a plain real number.
    pub fn days(self) -> f64 {
        self.0
    }

    /// Ceiling of the age, clamped into 1..=30.
    ///
    /// An age of exactly `0.0` reports as day 1.
    pub fn moon_day(self) -> MoonDay {
        let day = self.0.ceil() as u8;
        MoonDay(day.clamp(MoonDay::MIN, MoonDay::MAX))
    }

    pub fn phase_symbol(self) -> PhaseSymbol {
        derive_phase_symbol(self.moon_day())
    }

    /// Position inside the lunation, `0.0..1.0`.
    pub fn cycle_fraction(self) -> f64 {
        self.0 / SYNODIC_MONTH_DAYS
    }

    pub fn light_rotation(self) -> f64 {
        light_rotation(self.0)
    }

    pub fn illuminated_fraction(self) -> f64 {
        illuminated_fraction(self.0)
    }
}

impl From<LunarAge> for f64 {
    fn from(age: LunarAge) -> f64 {
        age.0
    }
}

impl fmt::Display for LunarAge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} d", self.0)
    }
}

/// Display index of the lunar day, always within 1..=30.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MoonDay(u8);

impl MoonDay {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 30;

    pub fn new(day: u32) -> Result<Self, LunarError> {
        match u8::try_from(day) {
            Ok(d) if (Self::MIN..=Self::MAX).contains(&d) => Ok(MoonDay(d)),
            _ => Err(LunarError::MoonDayOutOfRange { day }),
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u32> for MoonDay {
    type Error = LunarError;

    fn try_from(day: u32) -> Result<Self, Self::Error> {
        MoonDay::new(day)
    }
}

impl fmt::Display for MoonDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Eight display categories of the lunar cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseSymbol {
    /// Days 1–2 and 29–30
    NewMoon,
    /// Days 3–7
    WaxingCrescent,
    /// Days 8–10
    FirstQuarter,
    /// Days 11–13
    WaxingGibbous,
    /// Days 14–17
    FullMoon,
    /// Days 18–21
    WaningGibbous,
    /// Days 22–24
    LastQuarter,
    /// Days 25–28
    WaningCrescent,
}

impl PhaseSymbol {
    /// All symbols in cycle order, starting at new moon.
    pub const ALL: [PhaseSymbol; 8] = [
        PhaseSymbol::NewMoon,
        PhaseSymbol::WaxingCrescent,
        PhaseSymbol::FirstQuarter,
        PhaseSymbol::WaxingGibbous,
        PhaseSymbol::FullMoon,
        PhaseSymbol::WaningGibbous,
        PhaseSymbol::LastQuarter,
        PhaseSymbol::WaningCrescent,
    ];

    /// Bucket a raw moon day index. Indices outside 1..=30 have no symbol.
    pub fn from_moon_day(day: u32) -> Option<Self> {
        match day {
            1..=2 | 29..=30 => Some(PhaseSymbol::NewMoon),
            3..=7 => Some(PhaseSymbol::WaxingCrescent),
            8..=10 => Some(PhaseSymbol::FirstQuarter),
            11..=13 => Some(PhaseSymbol::WaxingGibbous),
            14..=17 => Some(PhaseSymbol::FullMoon),
            18..=21 => Some(PhaseSymbol::WaningGibbous),
            22..=24 => Some(PhaseSymbol::LastQuarter),
            25..=28 => Some(PhaseSymbol::WaningCrescent),
            _ => None,
        }
    }

    /// Unicode moon glyph (U+1F311 ..= U+1F318).
    pub fn glyph(self) -> char {
        match self {
            PhaseSymbol::NewMoon => '\u{1f311}',
            PhaseSymbol::WaxingCrescent => '\u{1f312}',
            PhaseSymbol::FirstQuarter => '\u{1f313}',
            PhaseSymbol::WaxingGibbous => '\u{1f314}',
            PhaseSymbol::FullMoon => '\u{1f315}',
            PhaseSymbol::WaningGibbous => '\u{1f316}',
            PhaseSymbol::LastQuarter => '\u{1f317}',
            PhaseSymbol::WaningCrescent => '\u{1f318}',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PhaseSymbol::NewMoon => "new moon",
            PhaseSymbol::WaxingCrescent => "waxing crescent",
            PhaseSymbol::FirstQuarter => "first quarter",
            PhaseSymbol::WaxingGibbous => "waxing gibbous",
            PhaseSymbol::FullMoon => "full moon",
            PhaseSymbol::WaningGibbous => "waning gibbous",
            PhaseSymbol::LastQuarter => "last quarter",
            PhaseSymbol::WaningCrescent => "waning crescent",
        }
    }
}

impl fmt::Display for PhaseSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compute the moon age for a calendar date.
///
/// Counts whole days from 1970-08-01, converts to seconds, adds the epoch's
/// own phase offset and wraps on the synodic month with a Euclidean
/// remainder, so dates before the epoch still land in `[0, 29.53…)`.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use moonlight_lib::lunar::compute_lunar_age;
///
/// let epoch = NaiveDate::from_ymd_opt(1970, 8, 1).unwrap();
/// let age = compute_lunar_age(epoch);
/// assert!((age.days() - 12_300.0 / 86_400.0).abs() < 1e-12);
/// ```
pub fn compute_lunar_age(date: NaiveDate) -> LunarAge {
    let days_since_start = i64::from(date.num_days_from_ce()) - EPOCH_DAYS_FROM_CE;
    // chrono caps dates near ±262 000 years, so this stays far inside i64
    let total_seconds = days_since_start * DAY_SECONDS + DAY_OFFSET;
    LunarAge::from_remainder_seconds(total_seconds.rem_euclid(LUNAR_MONTH_SECONDS))
}

/// Map a validated moon day onto its phase symbol.
pub fn derive_phase_symbol(moon_day: MoonDay) -> PhaseSymbol {
    // every value MoonDay admits has a bucket
    PhaseSymbol::from_moon_day(u32::from(moon_day.get())).unwrap_or(PhaseSymbol::NewMoon)
}

/// Rotation (radians) a renderer applies to its light source for `age_days`.
pub fn light_rotation(age_days: f64) -> f64 {
    (age_days - LIGHT_PIVOT_DAYS) * LIGHT_RADIANS_PER_DAY
}

/// Illuminated fraction, 0 at new moon rising linearly to 1 at mid-cycle.
pub fn illuminated_fraction(age_days: f64) -> f64 {
    let half = SYNODIC_MONTH_DAYS / 2.0;
    (1.0 - (age_days - half).abs() / half).clamp(0.0, 1.0)
}

/// Parse `YYYY-MM-DD` or `MM/DD/YYYY` into a calendar date.
pub fn parse_calendar_date(text: &str) -> Result<NaiveDate, LunarError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LunarError::invalid_input(text, "empty date"));
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| LunarError::invalid_input(text, "expected YYYY-MM-DD or MM/DD/YYYY"))
}

/// Build a calendar date from its parts, rejecting impossible days.
pub fn calendar_date(year: i32, month: u32, day: u32) -> Result<NaiveDate, LunarError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        LunarError::invalid_input(
            &format!("{year:04}-{month:02}-{day:02}"),
            "no such calendar day",
        )
    })
}

/// Where one calendar day ends and the next begins.
///
/// Instants are shifted by this fixed offset before their date is taken.
/// The default is UTC, which keeps results independent of the host zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary(FixedOffset);

impl DayBoundary {
    pub fn utc() -> Self {
        DayBoundary(Utc.fix())
    }

    pub fn from_offset_minutes(minutes: i32) -> Result<Self, LunarError> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(DayBoundary)
            .ok_or(LunarError::InvalidDayBoundary { minutes })
    }

    pub fn offset_minutes(&self) -> i32 {
        self.0.local_minus_utc() / 60
    }

    /// Calendar date of `instant` as seen from this boundary.
    pub fn calendar_date<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> NaiveDate {
        instant.with_timezone(&self.0).date_naive()
    }
}

impl Default for DayBoundary {
    fn default() -> Self {
        DayBoundary::utc()
    }
}

/// Stateless moon-phase service handed to every consumer.
///
/// Holds nothing but the day boundary used to turn instants into dates,
/// so it is `Copy` and can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LunarPhaseCalculator {
    boundary: DayBoundary,
}

impl LunarPhaseCalculator {
    pub fn new(boundary: DayBoundary) -> Self {
        LunarPhaseCalculator { boundary }
    }

    pub fn day_boundary(&self) -> DayBoundary {
        self.boundary
    }

    pub fn lunar_age(&self, date: NaiveDate) -> LunarAge {
        compute_lunar_age(date)
    }

    pub fn lunar_age_at<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> LunarAge {
        compute_lunar_age(self.boundary.calendar_date(instant))
    }

    pub fn derive_phase_symbol(&self, moon_day: MoonDay) -> PhaseSymbol {
        derive_phase_symbol(moon_day)
    }

    /// Full reading (age, moon day, symbol) for a calendar date.
    pub fn reading(&self, date: NaiveDate) -> MoonReading {
        let age = compute_lunar_age(date);
        debug!(%date, age = age.days(), moon_day = age.moon_day().get(), "computed moon age");
        MoonReading::new(date, age)
    }

    pub fn reading_at<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> MoonReading {
        self.reading(self.boundary.calendar_date(instant))
    }

    /// Today's date according to the configured day boundary.
    pub fn today(&self) -> NaiveDate {
        self.boundary.calendar_date(&Utc::now())
    }
}
