//! # Moon Phase Text Rendering
//!
//! This module turns [`MoonReading`] values into the text the terminal front end prints:
//! the main summary ("Moon Day: 7 🌒"), an ASCII bar locating today inside the lunation,
//! and a day-per-row table for date ranges.

use crate::config::DisplayConfig;
use crate::lunar::SYNODIC_MONTH_DAYS;
use crate::MoonReading;
use chrono::NaiveDate;
use std::fmt::Write;
use tracing::warn;

/// Format a date with the configured strftime pattern.
///
/// chrono reports a bad pattern only when the value is written, so the
/// write is checked here and ISO format is used instead of panicking.
fn format_date(date: NaiveDate, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(pattern)).is_err() {
        warn!(pattern, "invalid date_format, falling back to ISO dates");
        return date.format("%Y-%m-%d").to_string();
    }
    out
}

/// Format the moon day with or without its glyph
fn format_moon_day(reading: &MoonReading, display: &DisplayConfig) -> String {
    if display.show_glyph {
        format!("{} {}", reading.moon_day, reading.phase.glyph())
    } else {
        reading.moon_day.to_string()
    }
}

/// Multi-line summary for a single reading.
pub fn format_summary(reading: &MoonReading, display: &DisplayConfig) -> String {
    let mut lines = vec![
        format_date(reading.date, &display.date_format),
        format!("Moon Day: {}", format_moon_day(reading, display)),
        format!(
            "Phase: {} (age {:.2} d, {:.0}% lit)",
            reading.phase,
            reading.age_days,
            reading.illuminated_fraction() * 100.0
        ),
    ];
    if display.show_light_rotation {
        lines.push(format!("Light rotation: {:+.3} rad", reading.light_rotation()));
    }
    lines.join("\n")
}

/// ASCII bar spanning one lunation, with `X` at the current age and `+` at full moon.
///
/// ```
/// use moonlight_lib::renderer::format_cycle_bar;
///
/// assert_eq!(format_cycle_bar(0.0, 10), "New |X----+----| New");
/// ```
pub fn format_cycle_bar(age_days: f64, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let column = |fraction: f64| ((fraction * width as f64).floor() as usize).min(width - 1);
    let now = column(age_days / SYNODIC_MONTH_DAYS);
    let full = column(0.5);

    let bar: String = (0..width)
        .map(|i| match i {
            _ if i == now => 'X',
            _ if i == full => '+',
            _ => '-',
        })
        .collect();
    format!("New |{bar}| New")
}

/// One row per reading: ISO date, moon day, glyph and phase name.
pub fn format_table(readings: &[MoonReading], display: &DisplayConfig) -> String {
    let mut out = String::from("Date        Day  Phase\n");
    for reading in readings {
        let glyph = if display.show_glyph {
            format!("{} ", reading.phase.glyph())
        } else {
            String::new()
        };
        // writing into a String cannot fail
        let _ = writeln!(
            out,
            "{:<10}  {:>3}  {}{}",
            reading.date.format("%Y-%m-%d"),
            reading.moon_day,
            glyph,
            reading.phase
        );
    }
    out
}

/// Print the summary and lunation bar to stdout.
pub fn draw_ascii(reading: &MoonReading, display: &DisplayConfig) {
    println!("{}", format_summary(reading, display));
    println!();
    println!("{}", format_cycle_bar(reading.age_days, display.cycle_bar_width));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::lunar::{LunarPhaseCalculator, PhaseSymbol};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn display() -> DisplayConfig {
        Config::default().display
    }

    #[test]
    fn test_format_date_default_pattern() {
        assert_eq!(format_date(ymd(1970, 8, 1), "%B %-d, %Y"), "August 1, 1970");
    }

    #[test]
    fn test_format_date_bad_pattern_falls_back() {
        assert_eq!(format_date(ymd(2024, 3, 5), "%Q"), "2024-03-05");
    }

    #[test]
    fn test_summary_at_epoch() {
        let reading = LunarPhaseCalculator::default().reading(ymd(1970, 8, 1));
        let summary = format_summary(&reading, &display());
        let lines: Vec<_> = summary.lines().collect();

        assert_eq!(lines[0], "August 1, 1970");
        assert_eq!(lines[1], "Moon Day: 1 🌑");
        assert_eq!(lines[2], "Phase: new moon (age 0.14 d, 1% lit)");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_summary_without_glyph_with_rotation() {
        let mut display = display();
        display.show_glyph = false;
        display.show_light_rotation = true;

        let reading = MoonReading {
            date: ymd(2024, 1, 1),
            age_days: 14.5,
            moon_day: 15,
            phase: PhaseSymbol::FullMoon,
        };
        let summary = format_summary(&reading, &display);

        assert!(summary.contains("Moon Day: 15\n"));
        assert!(summary.ends_with("Light rotation: +0.000 rad"));
    }

    #[test]
    fn test_cycle_bar_marks_full_and_now() {
        assert_eq!(format_cycle_bar(0.0, 10), "New |X----+----| New");
        assert_eq!(format_cycle_bar(SYNODIC_MONTH_DAYS / 2.0, 10), "New |-----X----| New");
        assert_eq!(format_cycle_bar(29.5, 10), "New |-----+---X| New");
        assert_eq!(format_cycle_bar(3.0, 0), "");
    }

    #[test]
    fn test_table_rows() {
        let calculator = LunarPhaseCalculator::default();
        let readings = vec![
            calculator.reading(ymd(1970, 8, 1)),
            calculator.reading(ymd(1970, 8, 16)),
        ];
        let table = format_table(&readings, &display());
        let rows: Vec<_> = table.lines().collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], "1970-08-01    1  🌑 new moon");
        assert_eq!(rows[2], "1970-08-16   16  🌕 full moon");
    }
}
