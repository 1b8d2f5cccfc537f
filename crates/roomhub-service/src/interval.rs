//! Time model: normalized schedule intervals and overlap testing.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate, NaiveTime};

use roomhub_core::error::AppError;
use roomhub_core::result::AppResult;
use roomhub_entity::class::{ClassSchedule, ClassSession, DayOfWeek, Period};

/// A class schedule reduced to what overlap testing needs.
///
/// Built on demand from a [`ClassSchedule`] or a [`ClassSession`]; never
/// stored. When built from a session it also carries the session's
/// released dates, which shared-occurrence searches skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleInterval {
    days: BTreeSet<DayOfWeek>,
    period: Period,
    start_time: NaiveTime,
    end_time: NaiveTime,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    released: BTreeSet<NaiveDate>,
}

impl ScheduleInterval {
    /// Validate and normalize a schedule.
    ///
    /// Fails with `InvalidSchedule` for an empty weekday set, an end date
    /// before the start date, or a custom period that does not end after
    /// it starts.
    pub fn normalize(schedule: &ClassSchedule) -> AppResult<Self> {
        if schedule.days.is_empty() {
            return Err(AppError::invalid_schedule(
                "A schedule needs at least one weekday",
            ));
        }
        if let Some(end) = schedule.end_date {
            if end < schedule.start_date {
                return Err(AppError::invalid_schedule(format!(
                    "End date {end} is before start date {}",
                    schedule.start_date
                )));
            }
        }
        let (start_time, end_time) = schedule.period.window();
        if start_time >= end_time {
            return Err(AppError::invalid_schedule(format!(
                "Period {} must end after it starts",
                schedule.period
            )));
        }

        Ok(Self {
            days: schedule.days.clone(),
            period: schedule.period,
            start_time,
            end_time,
            start_date: schedule.start_date,
            end_date: schedule.end_date,
            released: BTreeSet::new(),
        })
    }

    /// Normalize a stored session, including its released dates.
    pub fn of_session(session: &ClassSession) -> AppResult<Self> {
        let mut interval = Self::normalize(&session.schedule)?;
        interval.released = session.released.iter().map(|slot| slot.date).collect();
        Ok(interval)
    }

    /// First date of the range.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Last date of the range, if bounded.
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Time of day.
    pub fn period(&self) -> Period {
        self.period
    }

    /// True iff weekdays, periods, and date ranges all intersect.
    ///
    /// Periods are half-open windows, so a session ending at 12:00 does not
    /// overlap one starting at 12:00. Identical categorical periods always
    /// overlap. Open-ended ranges extend forever.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.days_intersect(other) && self.periods_intersect(other) && self.dates_intersect(other)
    }

    /// Whether the period windows intersect.
    pub fn periods_intersect(&self, other: &Self) -> bool {
        if self.period == other.period && self.period.is_categorical() {
            return true;
        }
        self.start_time < other.end_time && other.start_time < self.end_time
    }

    /// Whether this interval's time window intersects a period's window.
    pub fn covers_period(&self, period: Period) -> bool {
        if self.period == period {
            return true;
        }
        let (start, end) = period.window();
        self.start_time < end && start < self.end_time
    }

    fn days_intersect(&self, other: &Self) -> bool {
        self.days.intersection(&other.days).next().is_some()
    }

    fn dates_intersect(&self, other: &Self) -> bool {
        let before_other_ends = other.end_date.is_none_or(|end| self.start_date <= end);
        let after_other_starts = self.end_date.is_none_or(|end| other.start_date <= end);
        before_other_ends && after_other_starts
    }

    /// Whether the pattern meets on `date`, ignoring released dates.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        date >= self.start_date
            && self.end_date.is_none_or(|end| date <= end)
            && self.days.contains(&DayOfWeek::of(date))
    }

    /// Whether the pattern meets on `date` and that occurrence is not released.
    pub fn holds_on(&self, date: NaiveDate) -> bool {
        self.occurs_on(date) && !self.released.contains(&date)
    }

    /// Whether the pattern meets at least once. Open-ended patterns always do;
    /// a bounded range may be too short to contain any of its weekdays.
    pub fn has_occurrence(&self) -> bool {
        match self.end_date {
            None => true,
            Some(_) => self
                .start_date
                .iter_days()
                .take(7)
                .any(|date| self.occurs_on(date)),
        }
    }

    /// Earliest date on which both intervals hold their room.
    ///
    /// `None` when the intervals do not overlap, or when every shared
    /// occurrence was released by one side or the other.
    pub fn first_shared_occurrence(&self, other: &Self) -> Option<NaiveDate> {
        if !self.overlaps(other) {
            return None;
        }
        let from = self.start_date.max(other.start_date);
        let until = match (self.end_date, other.end_date) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) | (None, Some(a)) => a,
            // Past the last released date plus a week every shared weekday recurs unreleased.
            (None, None) => {
                let last_release = self
                    .released
                    .iter()
                    .chain(other.released.iter())
                    .max()
                    .copied()
                    .unwrap_or(from);
                from.max(last_release)
                    .checked_add_days(Days::new(7))
                    .unwrap_or(NaiveDate::MAX)
            }
        };

        from.iter_days()
            .take_while(|date| *date <= until)
            .find(|date| self.holds_on(*date) && other.holds_on(*date))
    }

    /// First date in `dates` on which this interval holds its room.
    pub fn first_hit<'a>(
        &self,
        dates: impl IntoIterator<Item = &'a NaiveDate>,
    ) -> Option<NaiveDate> {
        dates.into_iter().copied().find(|date| self.holds_on(*date))
    }
}

/// Move a schedule so that it starts on `start`, keeping its length when
/// the range is bounded.
pub fn shift_schedule(schedule: &ClassSchedule, start: NaiveDate) -> ClassSchedule {
    let end_date = schedule.end_date.map(|end| {
        let length = (end - schedule.start_date).num_days().max(0) as u64;
        start.checked_add_days(Days::new(length)).unwrap_or(NaiveDate::MAX)
    });
    ClassSchedule {
        days: schedule.days.clone(),
        period: schedule.period,
        start_date: start,
        end_date,
    }
}
