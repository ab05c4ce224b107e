//! Measurement value types and unit conversion utilities.
//!
//! OOXML expresses lengths in twentieths of a point (dxa), EMUs, half-points
//! and percentages depending on context; PDF user space is 1/72 inch. This
//! module provides the single `Measurement` value type the AST carries, plus
//! the conversion constants used when materializing DOCX output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::error::Error;

pub const EMUS_PER_INCH: i64 = 914_400;
pub const EMUS_PER_PT: i64 = 12_700;
pub const TWIPS_PER_PT: f64 = 20.0;

/// Supported measurement units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureUnit {
    /// Twentieth of a point (twip), the WordprocessingML default
    Dxa,
    /// Point (1/72 inch)
    Pt,
    /// Inch
    In,
    /// Centimeter
    Cm,
    /// Millimeter
    Mm,
    /// English Metric Unit (1/914400 inch)
    Emu,
    /// Fiftieths of a percent (table width type "pct")
    Pct,
    /// Automatic sizing, no numeric meaning
    Auto,
}

impl MeasureUnit {
    /// Get the unit abbreviation as used in OOXML attributes.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dxa => "dxa",
            Self::Pt => "pt",
            Self::In => "in",
            Self::Cm => "cm",
            Self::Mm => "mm",
            Self::Emu => "emu",
            Self::Pct => "pct",
            Self::Auto => "auto",
        }
    }
}

/// Length value with unit.
///
/// Small value object copied by value, immutable once constructed.
///
/// # Examples
///
/// ```
/// use pomelo::common::unit::{Measurement, MeasureUnit};
///
/// let m = Measurement::new(240.0, MeasureUnit::Dxa);
/// assert_eq!(m.to_points(), 12.0);
///
/// let m = "2.5cm".parse::<Measurement>().unwrap();
/// assert_eq!(m.unit(), MeasureUnit::Cm);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    value: f64,
    unit: MeasureUnit,
}

impl Measurement {
    #[inline]
    pub fn new(value: f64, unit: MeasureUnit) -> Self {
        Self { value, unit }
    }

    /// The `auto` sizing marker.
    #[inline]
    pub fn auto() -> Self {
        Self {
            value: 0.0,
            unit: MeasureUnit::Auto,
        }
    }

    /// A length in twips (dxa).
    #[inline]
    pub fn dxa(value: f64) -> Self {
        Self::new(value, MeasureUnit::Dxa)
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn unit(&self) -> MeasureUnit {
        self.unit
    }

    #[inline]
    pub fn is_auto(&self) -> bool {
        self.unit == MeasureUnit::Auto
    }

    /// Convert to points. `Pct` and `Auto` carry no absolute length and
    /// convert to 0.
    pub fn to_points(&self) -> f64 {
        match self.unit {
            MeasureUnit::Pt => self.value,
            MeasureUnit::Dxa => self.value / TWIPS_PER_PT,
            MeasureUnit::In => self.value * 72.0,
            MeasureUnit::Cm => self.value / 2.54 * 72.0,
            MeasureUnit::Mm => self.value / 25.4 * 72.0,
            MeasureUnit::Emu => self.value / EMUS_PER_PT as f64,
            MeasureUnit::Pct | MeasureUnit::Auto => 0.0,
        }
    }

    /// Convert to twips (dxa), rounding to the nearest whole twip.
    pub fn to_twips(&self) -> i64 {
        (self.to_points() * TWIPS_PER_PT).round() as i64
    }

    /// Convert to EMUs.
    pub fn to_emu(&self) -> i64 {
        (self.to_points() * EMUS_PER_PT as f64).round() as i64
    }
}

impl FromStr for Measurement {
    type Err = Error;

    /// Parse a measurement from an OOXML attribute value.
    ///
    /// A bare number is dxa (`"240"`); a trailing unit selects it
    /// (`"2.5cm"`, `"12pt"`); `"50%"` is `Pct`; `"auto"` is `Auto`.
    fn from_str(s: &str) -> Result<Self, Error> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::auto());
        }
        if let Some(num) = s.strip_suffix('%') {
            let value: f64 = num
                .trim()
                .parse()
                .map_err(|_| Error::InvalidFormat(format!("Bad percentage '{s}'")))?;
            return Ok(Self::new(value, MeasureUnit::Pct));
        }

        let split = s
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(s.len());
        let (num, suffix) = s.split_at(split);
        let value: f64 = num
            .trim()
            .parse()
            .map_err(|_| Error::InvalidFormat(format!("No numeric value in '{s}'")))?;

        let unit = match suffix.trim() {
            "" | "dxa" => MeasureUnit::Dxa,
            "pt" => MeasureUnit::Pt,
            "in" => MeasureUnit::In,
            "cm" => MeasureUnit::Cm,
            "mm" => MeasureUnit::Mm,
            "emu" => MeasureUnit::Emu,
            "pct" => MeasureUnit::Pct,
            other => {
                return Err(Error::InvalidFormat(format!("Unknown unit '{other}'")));
            },
        };
        Ok(Self::new(value, unit))
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit == MeasureUnit::Auto {
            write!(f, "auto")
        } else {
            write!(f, "{}{}", self.value, self.unit.as_str())
        }
    }
}
