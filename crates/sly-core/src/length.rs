#![forbid(unsafe_code)]

//! Pixel lengths.
//!
//! Layout variables are exchanged as CSS-style text (`"250px"`), but all
//! arithmetic happens on [`Length`], a finite pixel value. Parsing accepts a
//! `px` suffix or a bare number; any other unit is rejected rather than
//! silently misread.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A resolved length in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Length(f64);

impl Length {
    /// Zero pixels.
    pub const ZERO: Self = Self(0.0);

    /// Construct from a pixel value. Non-finite input collapses to zero.
    #[must_use]
    pub fn px(value: f64) -> Self {
        if value.is_finite() {
            Self(value)
        } else {
            Self::ZERO
        }
    }

    /// Raw pixel value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Parse `"<number>px"` or `"<number>"`.
    pub fn parse(input: &str) -> Result<Self, LengthParseError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(LengthParseError::Empty);
        }
        let number = match trimmed.strip_suffix("px") {
            Some(number) => number.trim_end(),
            None => {
                let unit_start = trimmed
                    .char_indices()
                    .rev()
                    .take_while(|(_, c)| c.is_ascii_alphabetic() || *c == '%')
                    .last()
                    .map(|(idx, _)| idx);
                if let Some(idx) = unit_start {
                    return Err(LengthParseError::UnsupportedUnit {
                        unit: trimmed[idx..].to_string(),
                    });
                }
                trimmed
            }
        };
        match number.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Self(value)),
            _ => Err(LengthParseError::InvalidNumber {
                input: trimmed.to_string(),
            }),
        }
    }

    /// CSS `clamp(min, self, max)`: the lower bound wins when bounds cross.
    #[must_use]
    pub fn clamp_between(self, min: Self, max: Self) -> Self {
        Self(self.0.min(max.0).max(min.0))
    }

    /// Round up to whole non-negative pixels.
    #[must_use]
    pub fn ceil_px(self) -> u32 {
        if self.0.is_nan() || self.0 <= 0.0 {
            0
        } else {
            self.0.ceil().min(f64::from(u32::MAX)) as u32
        }
    }

    /// Round to the nearest whole pixel.
    #[must_use]
    pub fn round(self) -> Self {
        Self(self.0.round())
    }
}

impl From<u32> for Length {
    fn from(value: u32) -> Self {
        Self(f64::from(value))
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            write!(f, "0px")
        } else {
            write!(f, "{}px", self.0)
        }
    }
}

impl FromStr for Length {
    type Err = LengthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Length {
    type Error = LengthParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Length> for String {
    fn from(value: Length) -> Self {
        value.to_string()
    }
}

/// Errors from [`Length::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LengthParseError {
    Empty,
    InvalidNumber { input: String },
    UnsupportedUnit { unit: String },
}

impl fmt::Display for LengthParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "length is empty"),
            Self::InvalidNumber { input } => write!(f, "invalid length {input:?}"),
            Self::UnsupportedUnit { unit } => {
                write!(f, "unsupported length unit {unit:?} (only px is resolved)")
            }
        }
    }
}

impl std::error::Error for LengthParseError {}
