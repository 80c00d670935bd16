//! Reference reaction times by sex and age bracket.

use gonogo_core::Sex;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBracket {
    #[serde(rename = "20s")]
    Twenties,
    #[serde(rename = "30s")]
    Thirties,
    #[serde(rename = "40s")]
    Forties,
    #[serde(rename = "50s")]
    Fifties,
    #[serde(rename = "60+")]
    SixtyPlus,
}

impl AgeBracket {
    /// Under-20s are scored against the 20s bracket.
    pub fn for_age(age: u32) -> Self {
        match age {
            0..=29 => Self::Twenties,
            30..=39 => Self::Thirties,
            40..=49 => Self::Forties,
            50..=59 => Self::Fifties,
            _ => Self::SixtyPlus,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Twenties => "20s",
            Self::Thirties => "30s",
            Self::Forties => "40s",
            Self::Fifties => "50s",
            Self::SixtyPlus => "60+",
        })
    }
}

/// Mean and standard deviation of median reaction time, in milliseconds.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Norm {
    pub mean: f64,
    pub sd: f64,
}

const fn norm(mean: f64, sd: f64) -> Norm {
    Norm { mean, sd }
}

/// Brackets are ordered 20s, 30s, 40s, 50s, 60+.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormTable {
    pub male: [Norm; 5],
    pub female: [Norm; 5],
}

impl Default for NormTable {
    fn default() -> Self {
        Self {
            male: [
                norm(320.0, 45.0),
                norm(335.0, 48.0),
                norm(355.0, 52.0),
                norm(380.0, 58.0),
                norm(415.0, 66.0),
            ],
            female: [
                norm(330.0, 45.0),
                norm(345.0, 48.0),
                norm(365.0, 52.0),
                norm(390.0, 58.0),
                norm(425.0, 66.0),
            ],
        }
    }
}

impl NormTable {
    pub fn lookup(&self, sex: Sex, bracket: AgeBracket) -> Norm {
        let row = match sex {
            Sex::Male => &self.male,
            Sex::Female => &self.female,
        };
        row[bracket.index()]
    }

    pub fn norms(&self) -> impl Iterator<Item = &Norm> {
        self.male.iter().chain(self.female.iter())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    Excellent,
    Good,
    Average,
    BelowAverage,
    NeedsImprovement,
}

impl Rating {
    /// Lower reaction times are better, so negative z scores rate higher.
    pub fn from_z(z: f64) -> Self {
        if z < -1.5 {
            Self::Excellent
        } else if z < -0.5 {
            Self::Good
        } else if z <= 0.5 {
            Self::Average
        } else if z <= 1.5 {
            Self::BelowAverage
        } else {
            Self::NeedsImprovement
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::BelowAverage => "Below Average",
            Self::NeedsImprovement => "Needs Improvement",
        })
    }
}
