use crate::error::{RollcallError, RollcallResult};
use jiff::{Timestamp, Zoned, civil::Date, tz::TimeZone};

/// One calendar day in the reference timezone, as the closed range of instants
/// `[00:00:00.000, 23:59:59.999]` local time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayWindow {
    pub date: Date,
    pub start: Timestamp,
    pub end: Timestamp,
}

impl DayWindow {
    /// A day that starts past the last representable instant is rejected like any other bad
    /// date. One that only ends past it is cut short at [`Timestamp::MAX`].
    pub fn new(date: Date, timezone: &TimeZone) -> RollcallResult<Self> {
        let start = date
            .to_zoned(timezone.clone())
            .map_err(|_| RollcallError::InvalidDate {
                original: format_date(date),
            })?
            .timestamp();
        let end = date
            .at(23, 59, 59, 999_000_000)
            .to_zoned(timezone.clone())
            .map_or(Timestamp::MAX, |end| end.timestamp());

        Ok(Self { date, start, end })
    }

    pub fn previous(&self) -> Option<Date> {
        self.date.yesterday().ok()
    }

    pub fn next(&self) -> Option<Date> {
        self.date.tomorrow().ok()
    }
}

pub fn today(timezone: &TimeZone) -> Date {
    Zoned::now().with_time_zone(timezone.clone()).date()
}

/// `DD/MM/YYYY`
pub fn format_date(date: Date) -> String {
    date.strftime("%d/%m/%Y").to_string()
}

pub fn attendance_path(date: Date) -> String {
    format!("/attendance/{}", format_date(date))
}

/// Strict `dd/mm/yyyy`: day and month take one or two digits, the year exactly four, and the
/// result has to exist on the calendar.
pub fn parse_date(original: &str) -> RollcallResult<Date> {
    let invalid = || RollcallError::InvalidDate {
        original: original.to_string(),
    };

    let mut parts = original.split('/');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let all_digits = |s: &str, lengths: &[usize]| {
        lengths.contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
    };
    if !(all_digits(day, &[1, 2]) && all_digits(month, &[1, 2]) && all_digits(year, &[4])) {
        return Err(invalid());
    }

    let (Ok(day), Ok(month), Ok(year)) = (
        day.parse::<i8>(),
        month.parse::<i8>(),
        year.parse::<i16>(),
    ) else {
        return Err(invalid());
    };
    Date::new(year, month, day).map_err(|_| invalid())
}

pub fn parse_day_month_year(day: &str, month: &str, year: &str) -> RollcallResult<Date> {
    parse_date(&format!("{day}/{month}/{year}"))
}
