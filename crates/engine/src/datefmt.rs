//! Moment-style date templates
//!
//! Timestamps are rendered with the same template language the settings use,
//! e.g. `YYYY-MM-DD[T]HH:mm`. Text inside `[...]` is copied literally, known
//! tokens are replaced, and every other character is kept as-is.
//!
//! | token | output                     | token | output                  |
//! |-------|----------------------------|-------|-------------------------|
//! | YYYY  | 2024                       | H HH  | 0..23, 00..23           |
//! | YY    | 24                         | h hh  | 1..12, 01..12           |
//! | GGGG  | ISO week-year              | k kk  | 1..24, 01..24           |
//! | Q     | 1..4                       | m mm  | minutes                 |
//! | M MM  | 1..12, 01..12              | s ss  | seconds                 |
//! | MMM   | Jan                        | S SS SSS | fractional seconds   |
//! | MMMM  | January                    | A a   | AM/PM, am/pm            |
//! | D DD  | 1..31, 01..31              | Z     | +02:00                  |
//! | Do    | 1st, 2nd, 3rd              | ZZ    | +0200                   |
//! | DDD DDDD | day of year             | X x   | unix seconds, millis    |
//! | d     | 0..6, Sunday = 0           | W WW  | ISO week                |
//! | dd ddd dddd | Su, Sun, Sunday      | E     | ISO weekday 1..7        |

use chrono::{Datelike, Timelike};
use frontdate_config::DEFAULT_DATE_FORMAT;
use frontdate_core::Instant;
use std::fmt;

/// Renders an instant as front-matter text
pub trait DateFormatter {
    /// Render `instant`
    fn format(&self, instant: &Instant) -> String;
}

impl<F> DateFormatter for F
where
    F: Fn(&Instant) -> String,
{
    fn format(&self, instant: &Instant) -> String {
        self(instant)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year,
    YearShort,
    IsoWeekYear,
    Quarter,
    Month,
    MonthPadded,
    MonthShort,
    MonthLong,
    Day,
    DayPadded,
    DayOrdinal,
    DayOfYear,
    DayOfYearPadded,
    Weekday,
    WeekdayMin,
    WeekdayShort,
    WeekdayLong,
    IsoWeekday,
    IsoWeek,
    IsoWeekPadded,
    Hour,
    HourPadded,
    Hour12,
    Hour12Padded,
    Hour24,
    Hour24Padded,
    Minute,
    MinutePadded,
    Second,
    SecondPadded,
    Tenths,
    Hundredths,
    Millis,
    MeridiemUpper,
    MeridiemLower,
    Offset,
    OffsetCompact,
    UnixSeconds,
    UnixMillis,
}

// Longest tokens first so `YYYY` wins over `YY`
const FIELDS: &[(&str, Field)] = &[
    ("YYYY", Field::Year),
    ("GGGG", Field::IsoWeekYear),
    ("MMMM", Field::MonthLong),
    ("DDDD", Field::DayOfYearPadded),
    ("dddd", Field::WeekdayLong),
    ("MMM", Field::MonthShort),
    ("DDD", Field::DayOfYear),
    ("ddd", Field::WeekdayShort),
    ("SSS", Field::Millis),
    ("YY", Field::YearShort),
    ("MM", Field::MonthPadded),
    ("Do", Field::DayOrdinal),
    ("DD", Field::DayPadded),
    ("dd", Field::WeekdayMin),
    ("WW", Field::IsoWeekPadded),
    ("HH", Field::HourPadded),
    ("hh", Field::Hour12Padded),
    ("kk", Field::Hour24Padded),
    ("mm", Field::MinutePadded),
    ("ss", Field::SecondPadded),
    ("SS", Field::Hundredths),
    ("ZZ", Field::OffsetCompact),
    ("Q", Field::Quarter),
    ("M", Field::Month),
    ("D", Field::Day),
    ("d", Field::Weekday),
    ("E", Field::IsoWeekday),
    ("W", Field::IsoWeek),
    ("H", Field::Hour),
    ("h", Field::Hour12),
    ("k", Field::Hour24),
    ("m", Field::Minute),
    ("s", Field::Second),
    ("S", Field::Tenths),
    ("A", Field::MeridiemUpper),
    ("a", Field::MeridiemLower),
    ("Z", Field::Offset),
    ("X", Field::UnixSeconds),
    ("x", Field::UnixMillis),
];

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Field(Field),
}

/// A compiled date template
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use frontdate_engine::datefmt::{DateFormat, DateFormatter};
///
/// let at = DateTime::parse_from_rfc3339("2024-01-02T10:30:00+01:00").unwrap();
/// let format = DateFormat::parse("YYYY-MM-DD[T]HH:mm");
///
/// assert_eq!(format.format(&at), "2024-01-02T10:30");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    template: String,
    tokens: Vec<Token>,
}

impl DateFormat {
    /// Compile a template; an empty template means the default one
    pub fn parse(template: &str) -> Self {
        let template = if template.is_empty() {
            DEFAULT_DATE_FORMAT
        } else {
            template
        };

        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(c) = rest.chars().next() {
            if c == '['
                && let Some(end) = rest[1..].find(']')
            {
                literal.push_str(&rest[1..=end]);
                rest = &rest[end + 2..];
                continue;
            }

            if let Some((token, field)) = FIELDS.iter().find(|(t, _)| rest.starts_with(t)) {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Field(*field));
                rest = &rest[token.len()..];
                continue;
            }

            literal.push(c);
            rest = &rest[c.len_utf8()..];
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }

        Self {
            template: template.to_string(),
            tokens,
        }
    }

    /// The template this format was compiled from
    pub fn template(&self) -> &str {
        &self.template
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::parse(DEFAULT_DATE_FORMAT)
    }
}

impl DateFormatter for DateFormat {
    fn format(&self, instant: &Instant) -> String {
        Rendered {
            tokens: &self.tokens,
            instant,
        }
        .to_string()
    }
}

struct Rendered<'a> {
    tokens: &'a [Token],
    instant: &'a Instant,
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in self.tokens {
            match token {
                Token::Literal(text) => f.write_str(text)?,
                Token::Field(field) => write_field(f, *field, self.instant)?,
            }
        }
        Ok(())
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn write_offset(f: &mut fmt::Formatter<'_>, seconds: i32, separator: &str) -> fmt::Result {
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.unsigned_abs() / 60;
    write!(f, "{sign}{:02}{separator}{:02}", minutes / 60, minutes % 60)
}

fn write_field(f: &mut fmt::Formatter<'_>, field: Field, at: &Instant) -> fmt::Result {
    let hour12 = match at.hour() % 12 {
        0 => 12,
        h => h,
    };
    let hour24 = match at.hour() {
        0 => 24,
        h => h,
    };
    // Leap seconds are reported as nanosecond values past one second
    let nanos = at.nanosecond().min(999_999_999);
    let month0 = at.month0() as usize;
    let weekday = at.weekday().num_days_from_sunday() as usize;

    match field {
        Field::Year => write!(f, "{:04}", at.year()),
        Field::YearShort => write!(f, "{:02}", at.year().rem_euclid(100)),
        Field::IsoWeekYear => write!(f, "{:04}", at.iso_week().year()),
        Field::Quarter => write!(f, "{}", at.month0() / 3 + 1),
        Field::Month => write!(f, "{}", at.month()),
        Field::MonthPadded => write!(f, "{:02}", at.month()),
        Field::MonthShort => f.write_str(&MONTHS[month0][..3]),
        Field::MonthLong => f.write_str(MONTHS[month0]),
        Field::Day => write!(f, "{}", at.day()),
        Field::DayPadded => write!(f, "{:02}", at.day()),
        Field::DayOrdinal => write!(f, "{}{}", at.day(), ordinal_suffix(at.day())),
        Field::DayOfYear => write!(f, "{}", at.ordinal()),
        Field::DayOfYearPadded => write!(f, "{:03}", at.ordinal()),
        Field::Weekday => write!(f, "{weekday}"),
        Field::WeekdayMin => f.write_str(&WEEKDAYS[weekday][..2]),
        Field::WeekdayShort => f.write_str(&WEEKDAYS[weekday][..3]),
        Field::WeekdayLong => f.write_str(WEEKDAYS[weekday]),
        Field::IsoWeekday => write!(f, "{}", at.weekday().number_from_monday()),
        Field::IsoWeek => write!(f, "{}", at.iso_week().week()),
        Field::IsoWeekPadded => write!(f, "{:02}", at.iso_week().week()),
        Field::Hour => write!(f, "{}", at.hour()),
        Field::HourPadded => write!(f, "{:02}", at.hour()),
        Field::Hour12 => write!(f, "{hour12}"),
        Field::Hour12Padded => write!(f, "{hour12:02}"),
        Field::Hour24 => write!(f, "{hour24}"),
        Field::Hour24Padded => write!(f, "{hour24:02}"),
        Field::Minute => write!(f, "{}", at.minute()),
        Field::MinutePadded => write!(f, "{:02}", at.minute()),
        Field::Second => write!(f, "{}", at.second()),
        Field::SecondPadded => write!(f, "{:02}", at.second()),
        Field::Tenths => write!(f, "{}", nanos / 100_000_000),
        Field::Hundredths => write!(f, "{:02}", nanos / 10_000_000),
        Field::Millis => write!(f, "{:03}", nanos / 1_000_000),
        Field::MeridiemUpper => f.write_str(if at.hour() < 12 { "AM" } else { "PM" }),
        Field::MeridiemLower => f.write_str(if at.hour() < 12 { "am" } else { "pm" }),
        Field::Offset => write_offset(f, at.offset().local_minus_utc(), ":"),
        Field::OffsetCompact => write_offset(f, at.offset().local_minus_utc(), ""),
        Field::UnixSeconds => write!(f, "{}", at.timestamp()),
        Field::UnixMillis => write!(f, "{}", at.timestamp_millis()),
    }
}
