//! # Selected-Date Controller
//!
//! Owns the one piece of mutable application state: which calendar date the user is
//! looking at. Presentation layers never hold their own copy. They subscribe a
//! [`PhaseObserver`] and receive a fresh [`MoonReading`] every time the selection
//! changes, in the order they subscribed.
//!
//! Swiping through dates in a viewer maps onto [`Timeline::move_on`] with `±1`.

use crate::lunar::{LunarError, LunarPhaseCalculator};
use crate::MoonReading;
use chrono::{Days, NaiveDate};
use tracing::debug;

/// Receives a reading whenever the selected date changes.
pub trait PhaseObserver {
    fn phase_changed(&mut self, reading: &MoonReading);
}

impl<F> PhaseObserver for F
where
    F: FnMut(&MoonReading),
{
    fn phase_changed(&mut self, reading: &MoonReading) {
        self(reading)
    }
}

/// The currently selected date plus everyone interested in it.
pub struct Timeline {
    calculator: LunarPhaseCalculator,
    selected: NaiveDate,
    observers: Vec<Box<dyn PhaseObserver>>,
}

impl Timeline {
    pub fn new(calculator: LunarPhaseCalculator, selected: NaiveDate) -> Self {
        Timeline {
            calculator,
            selected,
            observers: Vec::new(),
        }
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    pub fn reading(&self) -> MoonReading {
        self.calculator.reading(self.selected)
    }

    /// Register an observer. It is not called until the next change.
    pub fn subscribe(&mut self, observer: impl PhaseObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Select `date` and notify every observer.
    pub fn select(&mut self, date: NaiveDate) -> MoonReading {
        self.selected = date;
        let reading = self.reading();
        debug!(
            date = %reading.date,
            moon_day = reading.moon_day,
            observers = self.observers.len(),
            "selected date changed"
        );
        for observer in &mut self.observers {
            observer.phase_changed(&reading);
        }
        reading
    }

    /// Shift the selection by whole days (negative moves back).
    ///
    /// Leaves the selection untouched if the result is not representable.
    pub fn move_on(&mut self, days: i64) -> Result<MoonReading, LunarError> {
        let shifted = shift_days(self.selected, days).ok_or(LunarError::DateOutOfRange { days })?;
        Ok(self.select(shifted))
    }

    /// Daily readings starting at the selected date.
    pub fn readings(&self, count: usize) -> impl Iterator<Item = MoonReading> {
        let calculator = self.calculator;
        self.selected
            .iter_days()
            .take(count)
            .map(move |date| calculator.reading(date))
    }
}

fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn timeline_at(date: NaiveDate) -> Timeline {
        Timeline::new(LunarPhaseCalculator::default(), date)
    }

    #[test]
    fn test_move_on_forward_and_back() {
        let mut timeline = timeline_at(ymd(2024, 2, 28));

        let next = timeline.move_on(1).unwrap();
        assert_eq!(next.date, ymd(2024, 2, 29));
        assert_eq!(timeline.selected(), ymd(2024, 2, 29));

        let back = timeline.move_on(-30).unwrap();
        assert_eq!(back.date, ymd(2024, 1, 30));
    }

    #[test]
    fn test_move_on_zero_still_notifies() {
        let count = Rc::new(RefCell::new(0));
        let seen = Rc::clone(&count);

        let mut timeline = timeline_at(ymd(2024, 1, 1));
        timeline.subscribe(move |_: &MoonReading| *seen.borrow_mut() += 1);
        timeline.move_on(0).unwrap();

        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_observers_receive_each_change_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut timeline = timeline_at(ymd(1970, 8, 1));
        let first = Rc::clone(&log);
        timeline.subscribe(move |r: &MoonReading| first.borrow_mut().push(("first", r.date)));
        let second = Rc::clone(&log);
        timeline.subscribe(move |r: &MoonReading| second.borrow_mut().push(("second", r.date)));

        timeline.move_on(1).unwrap();
        timeline.select(ymd(2000, 1, 1));

        assert_eq!(
            *log.borrow(),
            vec![
                ("first", ymd(1970, 8, 2)),
                ("second", ymd(1970, 8, 2)),
                ("first", ymd(2000, 1, 1)),
                ("second", ymd(2000, 1, 1)),
            ]
        );
    }

    #[test]
    fn test_observer_reading_matches_calculator() {
        let received = Rc::new(RefCell::new(None));
        let slot = Rc::clone(&received);

        let mut timeline = timeline_at(ymd(2024, 6, 1));
        timeline.subscribe(move |r: &MoonReading| *slot.borrow_mut() = Some(*r));
        let returned = timeline.move_on(5).unwrap();

        let expected = LunarPhaseCalculator::default().reading(ymd(2024, 6, 6));
        assert_eq!(returned, expected);
        assert_eq!(*received.borrow(), Some(expected));
    }

    #[test]
    fn test_overflow_leaves_selection_unchanged() {
        let mut timeline = timeline_at(NaiveDate::MAX);
        let err = timeline.move_on(1).unwrap_err();

        assert_eq!(err, LunarError::DateOutOfRange { days: 1 });
        assert_eq!(timeline.selected(), NaiveDate::MAX);

        let mut timeline = timeline_at(NaiveDate::MIN);
        assert!(timeline.move_on(i64::MIN).is_err());
        assert_eq!(timeline.selected(), NaiveDate::MIN);
    }

    #[test]
    fn test_readings_are_consecutive_days() {
        let timeline = timeline_at(ymd(2024, 12, 30));
        let readings: Vec<_> = timeline.readings(4).collect();

        let dates: Vec<_> = readings.iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![
                ymd(2024, 12, 30),
                ymd(2024, 12, 31),
                ymd(2025, 1, 1),
                ymd(2025, 1, 2)
            ]
        );
        // reading a range does not move the selection
        assert_eq!(timeline.selected(), ymd(2024, 12, 30));
    }
}
