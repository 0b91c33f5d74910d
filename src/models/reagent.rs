use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A chemical substance available to the lab.
///
/// Only `id` takes part in reaction matching. `name` and `formula` are display
/// strings, while `phase` and `color` drive the vessel's appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reagent {
    pub id: String,
    pub name: String,
    pub formula: String,
    pub phase: Phase,
    pub color: Hsla,
}

/// Physical state of a reagent.
///
/// - `Solid`: rendered as discrete particles, no contribution to the liquid blend
/// - `Liquid`: blended into the vessel color, weighted by quantity
/// - `Gas`: neither blended nor rendered as particles
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Solid,
    Liquid,
    Gas,
}

/// A color in HSL space with alpha.
///
/// Hue is in degrees, saturation and lightness in percent, alpha in `0.0..=1.0`.
/// Serialized as a CSS string such as `hsla(200, 80%, 70%, 0.5)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hsla {
    pub h: f64,
    pub s: f64,
    pub l: f64,
    pub a: f64,
}

impl Hsla {
    pub const fn new(h: f64, s: f64, l: f64, a: f64) -> Self {
        Self { h, s, l, a }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {0:?}: expected hsla(h, s%, l%, a) or hsl(h, s%, l%)")]
pub struct ColorParseError(pub String);

impl FromStr for Hsla {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_string());
        let trimmed = s.trim();

        let (body, expected) = if let Some(rest) = trimmed.strip_prefix("hsla(") {
            (rest, 4)
        } else if let Some(rest) = trimmed.strip_prefix("hsl(") {
            (rest, 3)
        } else {
            return Err(err());
        };
        let body = body.strip_suffix(')').ok_or_else(err)?;

        let parts = body
            .split(',')
            .map(|part| part.trim().trim_end_matches('%').trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| err())?;
        if parts.len() != expected || parts.iter().any(|v| !v.is_finite()) {
            return Err(err());
        }

        Ok(Self {
            h: parts[0],
            s: parts[1],
            l: parts[2],
            a: parts.get(3).copied().unwrap_or(1.0),
        })
    }
}

impl TryFrom<String> for Hsla {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Hsla> for String {
    fn from(color: Hsla) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Hsla {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsla({}, {}%, {}%, {})", self.h, self.s, self.l, self.a)
    }
}
