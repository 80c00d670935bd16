use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a single stimulus presentation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StimulusCategory {
    Go,
    #[serde(rename = "NOGO")]
    NoGo,
}

impl StimulusCategory {
    pub fn is_go(&self) -> bool {
        matches!(self, Self::Go)
    }

    /// How the presentation layer is expected to draw this category.
    pub fn appearance(&self) -> StimulusAppearance {
        match self {
            Self::Go => StimulusAppearance {
                shape: Shape::Circle,
                color: [0x2e, 0xcc, 0x71, 255],
            },
            Self::NoGo => StimulusAppearance {
                shape: Shape::Square,
                color: [0xe7, 0x4c, 0x3c, 255],
            },
        }
    }
}

impl fmt::Display for StimulusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Go => "GO",
            Self::NoGo => "NOGO",
        })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    Circle,
    Square,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StimulusAppearance {
    pub shape: Shape,
    pub color: [u8; 4],
}
