//! Weekly recurrence pattern of a class session.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use roomhub_core::AppError;

/// Day of the week, serialized by lowercase English name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// Day of week of a calendar date.
    pub fn of(date: NaiveDate) -> Self {
        date.weekday().into()
    }

    /// Return the day as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
            Self::Sunday => "sunday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Mon => Self::Monday,
            Weekday::Tue => Self::Tuesday,
            Weekday::Wed => Self::Wednesday,
            Weekday::Thu => Self::Thursday,
            Weekday::Fri => Self::Friday,
            Weekday::Sat => Self::Saturday,
            Weekday::Sun => Self::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monday" | "mon" => Ok(Self::Monday),
            "tuesday" | "tue" => Ok(Self::Tuesday),
            "wednesday" | "wed" => Ok(Self::Wednesday),
            "thursday" | "thu" => Ok(Self::Thursday),
            "friday" | "fri" => Ok(Self::Friday),
            "saturday" | "sat" => Ok(Self::Saturday),
            "sunday" | "sun" => Ok(Self::Sunday),
            _ => Err(AppError::invalid_schedule(format!("Invalid day of week: '{s}'"))),
        }
    }
}

/// Time of day a session meets.
///
/// The three categorical periods cover fixed half-open windows; a custom
/// period carries explicit start and end times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// 07:00 to 12:00.
    Morning,
    /// 12:00 to 18:00.
    Afternoon,
    /// 18:00 to 23:00.
    Evening,
    /// Explicit window.
    Custom {
        /// Inclusive start.
        start: NaiveTime,
        /// Exclusive end.
        end: NaiveTime,
    },
}

impl Period {
    /// The categorical periods, in day order.
    pub const CATEGORICAL: [Period; 3] = [Period::Morning, Period::Afternoon, Period::Evening];

    /// Half-open `[start, end)` window covered by this period.
    pub fn window(&self) -> (NaiveTime, NaiveTime) {
        match *self {
            Self::Morning => (hm(7, 0), hm(12, 0)),
            Self::Afternoon => (hm(12, 0), hm(18, 0)),
            Self::Evening => (hm(18, 0), hm(23, 0)),
            Self::Custom { start, end } => (start, end),
        }
    }

    /// Whether this is one of the three named periods.
    pub fn is_categorical(&self) -> bool {
        !matches!(self, Self::Custom { .. })
    }

    /// Short label for tables and logs.
    pub fn label(&self) -> String {
        match self {
            Self::Morning => "morning".to_string(),
            Self::Afternoon => "afternoon".to_string(),
            Self::Evening => "evening".to_string(),
            Self::Custom { start, end } => {
                format!("{}-{}", start.format("%H:%M"), end.format("%H:%M"))
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Period {
    type Err = AppError;

    /// Parses `morning`, `afternoon`, `evening`, or `HH:MM-HH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "morning" => return Ok(Self::Morning),
            "afternoon" => return Ok(Self::Afternoon),
            "evening" => return Ok(Self::Evening),
            _ => {}
        }
        let (start, end) = s.split_once('-').ok_or_else(|| {
            AppError::invalid_schedule(format!(
                "Invalid period '{s}'. Expected morning, afternoon, evening, or HH:MM-HH:MM"
            ))
        })?;
        let parse = |t: &str| {
            NaiveTime::parse_from_str(t.trim(), "%H:%M")
                .map_err(|e| AppError::invalid_schedule(format!("Invalid time '{t}': {e}")))
        };
        Ok(Self::Custom {
            start: parse(start)?,
            end: parse(end)?,
        })
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// Recurrence of a class session: which weekdays, which period, and over
/// which inclusive date range. An absent `end_date` recurs indefinitely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSchedule {
    /// Weekdays the class meets on.
    pub days: BTreeSet<DayOfWeek>,
    /// Time of day.
    pub period: Period,
    /// First day of the recurrence.
    pub start_date: NaiveDate,
    /// Last day of the recurrence, inclusive.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl ClassSchedule {
    /// Whether `date` lies inside the date range.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.is_none_or(|end| date <= end)
    }

    /// Whether the class meets on `date`.
    pub fn meets_on(&self, date: NaiveDate) -> bool {
        self.covers(date) && self.days.contains(&DayOfWeek::of(date))
    }
}
