//! Test suite for calendar arithmetic
//!
//! Tests cover:
//! - Exact calendar age with month borrowing
//! - Flat totals derived from the raw time difference
//! - Next-birthday distance, including 29 February
//! - Work-period summation and the 365.25 / 30.44 decomposition
//! - Validation messages

use calcdesk::dates::{
    age_between, age_report, decompose_days, next_birthday, parse_date, span_totals,
    sum_work_periods, DateError, DateSpan, NextBirthday,
};
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_age_between_exact_subtraction() {
    let age = age_between(date(2000, 1, 1), date(2024, 6, 15));
    assert_eq!(age, DateSpan::new(24, 5, 14));
    assert_eq!(age.to_string(), "24 years, 5 months, 14 days");
}

#[test]
fn test_age_between_borrows_days_and_months() {
    // Days borrow February 2024 (29 days), months borrow a year.
    let age = age_between(date(2023, 5, 20), date(2024, 3, 10));
    assert_eq!(age, DateSpan::new(0, 9, 19));
}

#[test]
fn test_age_between_non_positive_interval_is_zero() {
    assert_eq!(
        age_between(date(2024, 6, 15), date(2024, 6, 15)),
        DateSpan::default()
    );
    assert_eq!(
        age_between(date(2024, 6, 15), date(2020, 1, 1)),
        DateSpan::default()
    );
}

#[test]
fn test_span_totals_round_up_partial_days() {
    let from = date(2000, 1, 1).and_hms_opt(0, 0, 0).unwrap();
    let to = date(2000, 1, 8).and_hms_opt(12, 0, 0).unwrap();
    let span = DateSpan::new(0, 0, 7);
    let totals = span_totals(from, to, &span);

    assert_eq!(totals.total_days, 8);
    assert_eq!(totals.total_weeks, 1);
    assert_eq!(totals.total_hours, 192);
    assert_eq!(totals.total_minutes, 11_520);
    assert_eq!(totals.total_months, 0);
}

#[test]
fn test_next_birthday() {
    let birth = date(1990, 6, 20);
    assert_eq!(
        next_birthday(birth, date(2024, 6, 15)),
        NextBirthday { months: 0, days: 5 }
    );

    // Already passed this year: 15 June → 10 June next year.
    let birth = date(1990, 6, 10);
    assert_eq!(
        next_birthday(birth, date(2024, 6, 15)),
        NextBirthday {
            months: 11,
            days: 26
        }
    );

    let today = next_birthday(date(1990, 6, 15), date(2024, 6, 15));
    assert!(today.is_today());
    assert_eq!(today.to_string(), "Today!");
}

#[test]
fn test_next_birthday_from_end_of_long_month() {
    // 31 January plus one month is 28 February, one day before 1 March.
    assert_eq!(
        next_birthday(date(2000, 3, 1), date(2023, 1, 31)),
        NextBirthday { months: 1, days: 1 }
    );
    assert_eq!(
        next_birthday(date(2000, 3, 1), date(2024, 1, 31)),
        NextBirthday { months: 1, days: 1 }
    );
    assert_eq!(
        next_birthday(date(1990, 3, 31), date(2023, 1, 31)),
        NextBirthday { months: 2, days: 0 }
    );
}

#[test]
fn test_leap_day_birthday_falls_on_first_of_march() {
    let birth = date(2000, 2, 29);
    assert_eq!(
        next_birthday(birth, date(2023, 2, 28)),
        NextBirthday { months: 0, days: 1 }
    );
    assert!(next_birthday(birth, date(2024, 2, 29)).is_today());
}

#[test]
fn test_age_report() {
    let now = date(2024, 6, 15).and_hms_opt(12, 0, 0).unwrap();
    let report = age_report("2000-01-01", now).unwrap();

    assert_eq!(report.age, DateSpan::new(24, 5, 14));
    assert_eq!(report.totals.total_months, 293);
    assert_eq!(report.totals.total_days, 8933);
    assert_eq!(report.totals.total_weeks, 1276);
    assert_eq!(report.totals.total_hours, 8933 * 24);
    assert_eq!(report.next_birthday, NextBirthday { months: 6, days: 17 });
}

#[test]
fn test_age_report_validation() {
    let now = date(2024, 6, 15).and_hms_opt(0, 0, 0).unwrap();

    let error = age_report("  ", now).unwrap_err();
    assert_eq!(error, DateError::MissingBirthDate);
    assert_eq!(error.to_string(), "Please enter your date of birth.");

    let error = age_report("15/06/2000", now).unwrap_err();
    assert_eq!(
        error.to_string(),
        "Invalid date format. Please use YYYY-MM-DD."
    );

    let error = age_report("2030-01-01", now).unwrap_err();
    assert_eq!(error, DateError::BirthDateInFuture);
    assert_eq!(error.to_string(), "Date of birth cannot be in the future.");
}

#[test]
fn test_parse_date() {
    assert_eq!(parse_date("2024-02-29").unwrap(), date(2024, 2, 29));
    assert!(matches!(
        parse_date("2023-02-29"),
        Err(DateError::InvalidFormat(_))
    ));
}

#[test]
fn test_single_month_period() {
    let total = sum_work_periods(&[("2020-01-01", "2020-01-31")]).unwrap();
    assert_eq!(total.total_days, 31);
    assert_eq!(total.span, DateSpan::new(0, 1, 1));
}

#[test]
fn test_multiple_periods_are_summed() {
    let total = sum_work_periods(&[
        ("2021-01-01", "2021-12-31"),
        ("2020-01-01", "2020-03-31"),
    ])
    .unwrap();
    assert_eq!(total.total_days, 456);
    // 456 % 365.25 = 90.75 → 2 months and 29.87 days, which rounds up and
    // carries into a third month.
    assert_eq!(total.span, DateSpan::new(1, 3, 0));
}

#[test]
fn test_single_day_period_is_inclusive() {
    let total = sum_work_periods(&[("2022-05-05", "2022-05-05")]).unwrap();
    assert_eq!(total.total_days, 1);
    assert_eq!(total.span, DateSpan::new(0, 0, 1));
}

#[test]
fn test_decompose_days_carries() {
    assert_eq!(decompose_days(0), DateSpan::default());
    assert_eq!(decompose_days(365), DateSpan::new(1, 0, 0));
    assert_eq!(decompose_days(30), DateSpan::new(0, 1, 0));
}

#[test]
fn test_work_period_validation() {
    let error = sum_work_periods(&[("2020-01-01", "")]).unwrap_err();
    assert_eq!(error, DateError::MissingPeriodDate);
    assert_eq!(
        error.to_string(),
        "Please fill in all 'From' and 'To' dates."
    );

    let error = sum_work_periods(&[("2020-02-01", "2020-01-01")]).unwrap_err();
    assert_eq!(
        error.to_string(),
        "'From Date' cannot be after 'To Date' in any period."
    );

    assert!(matches!(
        sum_work_periods(&[("2020-01-01", "soon")]),
        Err(DateError::InvalidFormat(_))
    ));

    let none: [(&str, &str); 0] = [];
    assert_eq!(sum_work_periods(&none).unwrap_err(), DateError::NoPeriods);
}
