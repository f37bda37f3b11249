//! Common types used across Vinolab

use serde::{Deserialize, Serialize};

use crate::error::{Result, VinolabError};

/// Number of numeric features recorded per sample
pub const FEATURE_COUNT: usize = 3;

/// Feature column names, in matrix column order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = ["alcohol", "malic_acid", "color_intensity"];

/// Cultivar label of a wine sample.
///
/// Exactly three classes exist; any other integer is rejected on conversion.
/// Serialized as the bare integer label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum WineClass {
    Class0,
    Class1,
    Class2,
}

impl WineClass {
    /// All classes in label order
    pub const ALL: [WineClass; 3] = [WineClass::Class0, WineClass::Class1, WineClass::Class2];

    /// Number of known classes
    pub const COUNT: usize = 3;

    /// Integer label as stored in the `target` column
    pub fn label(self) -> u8 {
        match self {
            WineClass::Class0 => 0,
            WineClass::Class1 => 1,
            WineClass::Class2 => 2,
        }
    }

    /// Position of this class in label-ordered arrays
    pub fn index(self) -> usize {
        self.label() as usize
    }

    /// Class at a label-ordered position
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Known label set, in order
    pub fn labels() -> [u8; 3] {
        [0, 1, 2]
    }
}

impl TryFrom<i64> for WineClass {
    type Error = VinolabError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(WineClass::Class0),
            1 => Ok(WineClass::Class1),
            2 => Ok(WineClass::Class2),
            other => Err(VinolabError::InvalidTarget(other)),
        }
    }
}

impl From<WineClass> for i64 {
    fn from(class: WineClass) -> Self {
        i64::from(class.label())
    }
}

impl std::fmt::Display for WineClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for WineClass {
    type Err = VinolabError;

    fn from_str(s: &str) -> Result<Self> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| VinolabError::Parse(format!("'{}' is not an integer target", s)))?;
        WineClass::try_from(value)
    }
}

/// The three measured features of one sample.
///
/// Construction through [`Features::new`] guarantees every value is finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Features {
    pub alcohol: f64,
    pub malic_acid: f64,
    pub color_intensity: f64,
}

impl Features {
    /// Build a feature vector, rejecting NaN and infinite values
    pub fn new(alcohol: f64, malic_acid: f64, color_intensity: f64) -> Result<Self> {
        let features = Self {
            alcohol,
            malic_acid,
            color_intensity,
        };
        features.validate()?;
        Ok(features)
    }

    /// Check that every value is a finite number
    pub fn validate(&self) -> Result<()> {
        for (&name, value) in FEATURE_NAMES.iter().zip(self.to_array()) {
            if !value.is_finite() {
                return Err(VinolabError::invalid_feature(name, "must be a finite number"));
            }
        }
        Ok(())
    }

    /// Values in [`FEATURE_NAMES`] order
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [self.alcohol, self.malic_acid, self.color_intensity]
    }
}
