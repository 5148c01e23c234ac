//! Calendar arithmetic behind the age and work-experience calculators.
//!
//! Two different methods are used on purpose:
//!
//! * the headline `years / months / days` of an age is exact calendar
//!   subtraction ([`age_between`]),
//! * the derived totals are computed from the raw time difference
//!   ([`span_totals`]), and the work-experience sum decomposes a day count
//!   with average year and month lengths ([`sum_work_periods`]).
//!
//! At the margins these can disagree by a day or so; callers that show both
//! should expect that.
//!
//! ```rust
//! use calcdesk::dates::{age_between, parse_date};
//!
//! let from = parse_date("2000-01-01").unwrap();
//! let to = parse_date("2024-06-15").unwrap();
//! let age = age_between(from, to);
//! assert_eq!((age.years, age.months, age.days), (24, 5, 14));
//! ```

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

/// Average year length used by [`sum_work_periods`].
pub const DAYS_PER_YEAR: f64 = 365.25;
/// Average month length used by [`sum_work_periods`].
pub const DAYS_PER_MONTH: f64 = 30.44;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Validation failures, each carrying the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// The birth date field was left empty.
    MissingBirthDate,
    /// A work period is missing its `from` or `to` date.
    MissingPeriodDate,
    /// The text is not a `YYYY-MM-DD` date.
    InvalidFormat(String),
    /// The birth date lies after "now".
    BirthDateInFuture,
    /// A period ends before it starts.
    PeriodOutOfOrder,
    /// There were no periods to sum.
    NoPeriods,
}

impl fmt::Display for DateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateError::MissingBirthDate => write!(f, "Please enter your date of birth."),
            DateError::MissingPeriodDate => {
                write!(f, "Please fill in all 'From' and 'To' dates.")
            }
            DateError::InvalidFormat(_) => write!(f, "Invalid date format. Please use YYYY-MM-DD."),
            DateError::BirthDateInFuture => write!(f, "Date of birth cannot be in the future."),
            DateError::PeriodOutOfOrder => {
                write!(f, "'From Date' cannot be after 'To Date' in any period.")
            }
            DateError::NoPeriods => write!(f, "Add at least one work period."),
        }
    }
}

impl Error for DateError {}

/// Calendar decomposition of an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateSpan {
    pub years: u32,
    /// Always `0..=11`.
    pub months: u32,
    pub days: u32,
}

impl DateSpan {
    pub fn new(years: u32, months: u32, days: u32) -> Self {
        Self {
            years,
            months,
            days,
        }
    }
}

impl fmt::Display for DateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} years, {} months, {} days",
            self.years, self.months, self.days
        )
    }
}

/// Flat totals derived alongside a [`DateSpan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpanTotals {
    pub total_months: u64,
    pub total_weeks: u64,
    pub total_days: u64,
    pub total_hours: u64,
    pub total_minutes: u64,
}

/// Distance to the next birthday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NextBirthday {
    pub months: u32,
    pub days: u32,
}

impl NextBirthday {
    pub fn is_today(&self) -> bool {
        self.months == 0 && self.days == 0
    }
}

impl fmt::Display for NextBirthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_today() {
            write!(f, "Today!")
        } else {
            write!(f, "{} months, {} days", self.months, self.days)
        }
    }
}

/// Everything the age calculator shows for one birth date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeReport {
    pub age: DateSpan,
    pub totals: SpanTotals,
    pub next_birthday: NextBirthday,
}

/// Summed work experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceTotal {
    pub span: DateSpan,
    /// Inclusive day count across all periods.
    pub total_days: u64,
}

/// Parse a `YYYY-MM-DD` date. Blank input is reported as an invalid format;
/// callers that need a "missing" message check for blanks first.
pub fn parse_date(text: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| DateError::InvalidFormat(text.to_string()))
}

/// Exact calendar difference between two dates.
///
/// Days borrow the length of the month preceding `to`'s month and months
/// borrow a year. `to` earlier than `from` yields a zero span.
pub fn age_between(from: NaiveDate, to: NaiveDate) -> DateSpan {
    if to <= from {
        return DateSpan::default();
    }

    let mut years = to.year() - from.year();
    let mut months = to.month() as i32 - from.month() as i32;
    let mut days = to.day() as i32 - from.day() as i32;

    if days < 0 {
        months -= 1;
        days += days_in_previous_month(to) as i32;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    DateSpan::new(years.max(0) as u32, months as u32, days.max(0) as u32)
}

/// Flat totals between two instants.
///
/// `total_days` rounds the millisecond difference up to whole days; weeks,
/// hours and minutes are derived from it. `total_months` comes from the
/// calendar span instead.
pub fn span_totals(from: NaiveDateTime, to: NaiveDateTime, span: &DateSpan) -> SpanTotals {
    let millis = (to - from).num_milliseconds().unsigned_abs();
    let per_day = MILLIS_PER_DAY as u64;
    let total_days = millis.div_ceil(per_day);
    let total_hours = total_days * 24;

    SpanTotals {
        total_months: span.years as u64 * 12 + span.months as u64,
        total_weeks: total_days / 7,
        total_days,
        total_hours,
        total_minutes: total_hours * 60,
    }
}

/// Months and days until the next anniversary of `birth`, seen from `today`.
///
/// Whole months are stepped forward from `today` (clamping to the end of
/// shorter months, so 31 January plus one month is 28 February) and the rest
/// is counted in days. A birthday falling today counts as zero. A 29 February
/// birthday is celebrated on 1 March in non-leap years.
pub fn next_birthday(birth: NaiveDate, today: NaiveDate) -> NextBirthday {
    let mut anniversary = anniversary_in(birth, today.year());
    if anniversary < today {
        anniversary = anniversary_in(birth, today.year() + 1);
    }

    let mut months = ((anniversary.year() - today.year()) * 12 + anniversary.month() as i32
        - today.month() as i32)
        .max(0) as u32;
    let step = |months: u32| today.checked_add_months(Months::new(months));
    let mut stepped = step(months).unwrap_or(anniversary);
    if stepped > anniversary && months > 0 {
        months -= 1;
        stepped = step(months).unwrap_or(today);
    }
    let days = (anniversary - stepped).num_days().max(0);

    NextBirthday {
        months,
        days: days as u32,
    }
}

/// Validate a birth date and compute the full age report as of `now`.
pub fn age_report(birth_text: &str, now: NaiveDateTime) -> Result<AgeReport, DateError> {
    if birth_text.trim().is_empty() {
        return Err(DateError::MissingBirthDate);
    }
    let birth = parse_date(birth_text)?;
    let birth_instant = birth.and_hms_opt(0, 0, 0).unwrap_or_default();
    if birth_instant > now {
        log::debug!("age_report: birth date {} is after {}", birth, now);
        return Err(DateError::BirthDateInFuture);
    }

    let today = now.date();
    let age = age_between(birth, today);
    Ok(AgeReport {
        age,
        totals: span_totals(birth_instant, now, &age),
        next_birthday: next_birthday(birth, today),
    })
}

/// Sum inclusive day counts of `(from, to)` periods and decompose the total
/// with [`DAYS_PER_YEAR`] and [`DAYS_PER_MONTH`].
///
/// ```rust
/// use calcdesk::dates::sum_work_periods;
///
/// let total = sum_work_periods(&[("2020-01-01", "2020-01-31")]).unwrap();
/// assert_eq!(total.total_days, 31);
/// assert_eq!((total.span.years, total.span.months, total.span.days), (0, 1, 1));
/// ```
pub fn sum_work_periods<S: AsRef<str>>(periods: &[(S, S)]) -> Result<ExperienceTotal, DateError> {
    if periods.is_empty() {
        return Err(DateError::NoPeriods);
    }

    let mut total_days: u64 = 0;
    for (from, to) in periods {
        let (from, to) = (from.as_ref(), to.as_ref());
        if from.trim().is_empty() || to.trim().is_empty() {
            return Err(DateError::MissingPeriodDate);
        }
        let from = parse_date(from)?;
        let to = parse_date(to)?;
        if from > to {
            return Err(DateError::PeriodOutOfOrder);
        }
        total_days += (to - from).num_days() as u64 + 1;
    }

    Ok(ExperienceTotal {
        span: decompose_days(total_days),
        total_days,
    })
}

/// Approximate `years / months / days` for a flat day count.
pub fn decompose_days(total_days: u64) -> DateSpan {
    if total_days == 0 {
        return DateSpan::default();
    }
    let total = total_days as f64;
    let mut years = (total / DAYS_PER_YEAR).floor() as u32;
    let remaining = total % DAYS_PER_YEAR;
    let mut months = (remaining / DAYS_PER_MONTH).floor() as u32;
    let mut days = (remaining % DAYS_PER_MONTH).round() as u32;

    if days >= 30 {
        months += 1;
        days = 0;
    }
    if months >= 12 {
        years += 1;
        months = 0;
    }
    DateSpan::new(years, months, days)
}

fn days_in_previous_month(date: NaiveDate) -> u32 {
    let first_of_month = date.with_day(1).unwrap_or(date);
    (first_of_month - Duration::days(1)).day()
}

fn anniversary_in(birth: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, birth.month(), birth.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
        .unwrap_or(birth)
}
