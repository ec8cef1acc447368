//! Byte-size formatting and unit conversion (binary, 1024-based).

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ByteUnit {
    B,
    KB,
    MB,
    GB,
    TB,
    PB,
    EB,
    ZB,
    YB,
}

impl ByteUnit {
    pub const LADDER: [ByteUnit; 9] = [
        ByteUnit::B,
        ByteUnit::KB,
        ByteUnit::MB,
        ByteUnit::GB,
        ByteUnit::TB,
        ByteUnit::PB,
        ByteUnit::EB,
        ByteUnit::ZB,
        ByteUnit::YB,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            ByteUnit::B => "B",
            ByteUnit::KB => "KB",
            ByteUnit::MB => "MB",
            ByteUnit::GB => "GB",
            ByteUnit::TB => "TB",
            ByteUnit::PB => "PB",
            ByteUnit::EB => "EB",
            ByteUnit::ZB => "ZB",
            ByteUnit::YB => "YB",
        }
    }

    /// Power of 1024 this unit stands for.
    pub fn exponent(&self) -> u32 {
        *self as u32
    }

    /// Number of bytes in one of this unit.
    pub fn multiplier(&self) -> i128 {
        1024_i128.pow(self.exponent())
    }
}

impl Display for ByteUnit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.symbol())
    }
}

impl FromStr for ByteUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ByteUnit::LADDER
            .into_iter()
            .find(|u| u.symbol() == s)
            .ok_or_else(|| format!("Unknown byte unit: {}", s))
    }
}

/// Outcome of [`to_bytes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToBytes {
    Bytes(i128),
    /// The suffix was not a known unit; carries the input unchanged.
    Unrecognized(String),
}

/// Most fractional digits any rendering carries.
pub const MAX_DECIMALS: usize = 20;

/// Fixed-point rendering of `value` with `places` decimals, rounding half away
/// from zero on the shortest decimal form of `value`, so `1.005` at two places
/// is `1.01`. A result that rounds to zero carries no sign.
fn round_decimal(value: f64, places: usize) -> String {
    let places = places.min(MAX_DECIMALS);
    let shortest = value.abs().to_string();
    let (integer, fraction) = shortest.split_once('.').unwrap_or((shortest.as_str(), ""));

    let mut digits: Vec<u8> = integer
        .bytes()
        .chain(fraction.bytes().chain(std::iter::repeat(b'0')).take(places))
        .map(|b| b - b'0')
        .collect();

    if fraction.as_bytes().get(places).is_some_and(|&d| d >= b'5') {
        let mut carried = true;
        for d in digits.iter_mut().rev() {
            if *d == 9 {
                *d = 0;
            } else {
                *d += 1;
                carried = false;
                break;
            }
        }
        if carried {
            digits.insert(0, 1);
        }
    }

    let int_len = digits.len() - places;
    let mut rendered = String::with_capacity(digits.len() + 2);
    if value.is_sign_negative() && digits.iter().any(|&d| d != 0) {
        rendered.push('-');
    }
    rendered.extend(digits[..int_len].iter().map(|&d| char::from(b'0' + d)));
    if places > 0 {
        rendered.push('.');
        rendered.extend(digits[int_len..].iter().map(|&d| char::from(b'0' + d)));
    }
    rendered
}

/// Shortest decimal rendering: `1.50` becomes `1.5`, `2.00` becomes `2`.
fn trim_decimal(rendered: String) -> String {
    if !rendered.contains('.') {
        return rendered;
    }
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Human-readable size, e.g. `format_bytes(1536, 1)` is `"1.5 KB"`.
///
/// The unit is the largest whose value is at least one, capped at YB. Negative
/// sizes format as `0 B`. `precision` is capped at [`MAX_DECIMALS`].
pub fn format_bytes(size: impl Into<i128>, precision: u32) -> String {
    let bytes = size.into().max(0);

    let mut unit = ByteUnit::B;
    for candidate in ByteUnit::LADDER.into_iter().skip(1) {
        if bytes < candidate.multiplier() {
            break;
        }
        unit = candidate;
    }

    let rendered = trim_decimal(round_decimal(
        bytes as f64 / unit.multiplier() as f64,
        precision as usize,
    ));
    format!("{} {}", rendered, unit)
}

/// Leading integer of `text`, in the manner of a lenient integer cast: optional
/// whitespace and sign, then digits; anything else stops the scan.
fn leading_integer(text: &str) -> i128 {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let mut value: i128 = 0;
    for d in digits.chars().map_while(|c| c.to_digit(10)) {
        value = value.saturating_mul(10).saturating_add(i128::from(d));
    }
    if negative {
        -value
    } else {
        value
    }
}

/// Parse `"<number><unit>"` where the unit is the last two characters (`KB`..`YB`,
/// case-insensitive). `to_bytes("2KB")` is `2048`.
///
/// Anything else is returned unchanged as [`ToBytes::Unrecognized`].
pub fn to_bytes(input: &str) -> ToBytes {
    let chars: Vec<char> = input.chars().collect();
    let split = chars.len().saturating_sub(2);
    let number: String = chars[..split].iter().collect();
    let suffix: String = chars[split..].iter().collect::<String>().to_uppercase();

    match suffix.parse::<ByteUnit>() {
        Ok(unit) if unit != ByteUnit::B => {
            ToBytes::Bytes(leading_integer(&number).saturating_mul(unit.multiplier()))
        }
        _ => ToBytes::Unrecognized(input.to_string()),
    }
}

/// Group the integer digits of a fixed-point rendering with `,`.
fn group_thousands(rendered: &str) -> String {
    let (sign, unsigned) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, c) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match fraction {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Express `bytes` in `target` (`KB`..`YB`) with fixed decimals and `,` grouping,
/// followed by the unit: `from_bytes(1_048_576, "MB", 2)` is `"1.00MB"`.
///
/// An unknown target yields `"0"` followed by the target text. `decimal_places`
/// is capped at [`MAX_DECIMALS`].
pub fn from_bytes(bytes: impl Into<i128>, target: &str, decimal_places: usize) -> String {
    let unit = match target.parse::<ByteUnit>() {
        Ok(unit) if unit != ByteUnit::B => unit,
        _ => return format!("0{}", target),
    };

    let rendered = round_decimal(bytes.into() as f64 / unit.multiplier() as f64, decimal_places);
    format!("{}{}", group_thousands(&rendered), unit)
}
