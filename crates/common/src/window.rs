use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowParseError {
    #[error("empty period")]
    Empty,
    #[error("invalid period '{0}': expected e.g. 5m, 1h, 1d2h, PT5M or 0:05:00")]
    Invalid(String),
    #[error("period '{0}' uses years or months, which are not supported")]
    CalendarUnit(String),
    #[error("period must be greater than zero")]
    Zero,
}

/// Aggregation window of a threshold condition.
///
/// Rendered the way the resource API reports it (`0:05:00`, `1 day, 0:00:00`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowSize(Duration);

impl WindowSize {
    pub fn from_secs(secs: u64) -> Result<Self, WindowParseError> {
        if secs == 0 {
            return Err(WindowParseError::Zero);
        }
        Ok(Self(Duration::from_secs(secs)))
    }

    pub fn as_secs(&self) -> u64 {
        self.0.as_secs()
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.as_secs();
        let days = total / SECS_PER_DAY;
        let rem = total % SECS_PER_DAY;
        let hours = rem / SECS_PER_HOUR;
        let minutes = (rem % SECS_PER_HOUR) / SECS_PER_MINUTE;
        let seconds = rem % SECS_PER_MINUTE;

        if days > 0 {
            let unit = if days == 1 { "day" } else { "days" };
            write!(f, "{days} {unit}, ")?;
        }
        write!(f, "{hours}:{minutes:02}:{seconds:02}")
    }
}

impl FromStr for WindowSize {
    type Err = WindowParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        if value.is_empty() {
            return Err(WindowParseError::Empty);
        }

        let secs = if value.contains(':') {
            parse_clock(value)?
        } else if value.starts_with(['P', 'p']) {
            parse_iso8601(value)?
        } else {
            parse_shorthand(value)?
        };

        Self::from_secs(secs)
    }
}

impl Serialize for WindowSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WindowSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Splits `1d2h30m` into `[(1, 'd'), (2, 'h'), (30, 'm')]`.
fn number_unit_pairs(body: &str, original: &str) -> Result<Vec<(u64, char)>, WindowParseError> {
    let invalid = || WindowParseError::Invalid(original.to_string());
    let mut pairs = Vec::new();
    let mut digits = String::new();

    for c in body.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if digits.is_empty() {
            return Err(invalid());
        }
        let n = digits.parse::<u64>().map_err(|_| invalid())?;
        pairs.push((n, c.to_ascii_lowercase()));
        digits.clear();
    }

    if !digits.is_empty() || pairs.is_empty() {
        return Err(invalid());
    }
    Ok(pairs)
}

/// Units must appear at most once and in descending order.
fn sum_units(
    pairs: &[(u64, char)],
    order: &[(char, u64)],
    original: &str,
) -> Result<u64, WindowParseError> {
    let invalid = || WindowParseError::Invalid(original.to_string());
    let mut next = 0;
    let mut total: u64 = 0;

    for &(n, unit) in pairs {
        let pos = order[next..]
            .iter()
            .position(|(u, _)| *u == unit)
            .ok_or_else(invalid)?;
        let (_, scale) = order[next + pos];
        total = n
            .checked_mul(scale)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(invalid)?;
        next += pos + 1;
    }
    Ok(total)
}

fn parse_shorthand(value: &str) -> Result<u64, WindowParseError> {
    let pairs = number_unit_pairs(value, value)?;
    sum_units(
        &pairs,
        &[
            ('d', SECS_PER_DAY),
            ('h', SECS_PER_HOUR),
            ('m', SECS_PER_MINUTE),
            ('s', 1),
        ],
        value,
    )
}

fn parse_iso8601(value: &str) -> Result<u64, WindowParseError> {
    let upper = value.to_ascii_uppercase();
    let body = &upper[1..];
    let (date_part, time_part) = match body.split_once('T') {
        Some((d, t)) => (d, Some(t)),
        None => (body, None),
    };

    let invalid = || WindowParseError::Invalid(value.to_string());
    let mut total: u64 = 0;
    if !date_part.is_empty() {
        if date_part.contains(['Y', 'M']) {
            return Err(WindowParseError::CalendarUnit(value.to_string()));
        }
        let pairs = number_unit_pairs(date_part, value)?;
        total = sum_units(&pairs, &[('d', SECS_PER_DAY)], value)?;
    }
    if let Some(time_part) = time_part {
        let pairs = number_unit_pairs(time_part, value)?;
        let time = sum_units(
            &pairs,
            &[('h', SECS_PER_HOUR), ('m', SECS_PER_MINUTE), ('s', 1)],
            value,
        )?;
        total = total.checked_add(time).ok_or_else(invalid)?;
    } else if date_part.is_empty() {
        return Err(invalid());
    }
    Ok(total)
}

fn parse_clock(value: &str) -> Result<u64, WindowParseError> {
    let invalid = || WindowParseError::Invalid(value.to_string());

    let (days, clock) = match value.split_once(',') {
        Some((day_part, clock)) => {
            let day_part = day_part.trim();
            let n = day_part
                .strip_suffix("days")
                .or_else(|| day_part.strip_suffix("day"))
                .ok_or_else(invalid)?
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid())?;
            (n, clock.trim())
        }
        None => (0, value),
    };

    let fields: Vec<&str> = clock.split(':').collect();
    let [h, m, s] = fields.as_slice() else {
        return Err(invalid());
    };
    let h: u64 = h.parse().map_err(|_| invalid())?;
    let m: u64 = m.parse().map_err(|_| invalid())?;
    let s: u64 = s.parse().map_err(|_| invalid())?;
    if m >= 60 || s >= 60 {
        return Err(invalid());
    }

    [(days, SECS_PER_DAY), (h, SECS_PER_HOUR), (m, SECS_PER_MINUTE), (s, 1)]
        .into_iter()
        .try_fold(0u64, |acc, (n, scale)| {
            n.checked_mul(scale).and_then(|v| acc.checked_add(v))
        })
        .ok_or_else(invalid)
}
