use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MAX_AGE: u32 = 120;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("age is required")]
    MissingAge,

    #[error("age {0:?} is not a whole number")]
    InvalidAge(String),

    #[error("age {0} is outside 0..=120")]
    AgeOutOfRange(i64),

    #[error("sex is required")]
    MissingSex,

    #[error("unknown sex {0:?}, expected \"male\" or \"female\"")]
    UnknownSex(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl FromStr for Sex {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ProfileError::MissingSex);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            _ => Err(ProfileError::UnknownSex(trimmed.to_owned())),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sex::Male => "male",
            Sex::Female => "female",
        })
    }
}

/// Demographics collected once before a session starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionProfile {
    age: u32,
    sex: Sex,
}

impl SessionProfile {
    pub fn new(age: u32, sex: Sex) -> Result<Self, ProfileError> {
        if age > MAX_AGE {
            return Err(ProfileError::AgeOutOfRange(age as i64));
        }
        Ok(Self { age, sex })
    }

    /// Validates the raw strings typed into an intake form.
    pub fn parse(age: &str, sex: &str) -> Result<Self, ProfileError> {
        let age = age.trim();
        if age.is_empty() {
            return Err(ProfileError::MissingAge);
        }
        let sex: Sex = sex.parse()?;
        let years: i64 = age
            .parse()
            .map_err(|_| ProfileError::InvalidAge(age.to_owned()))?;
        if !(0..=MAX_AGE as i64).contains(&years) {
            return Err(ProfileError::AgeOutOfRange(years));
        }
        Self::new(years as u32, sex)
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn sex(&self) -> Sex {
        self.sex
    }
}

impl<'de> Deserialize<'de> for SessionProfile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            age: u32,
            sex: Sex,
        }
        let raw = Raw::deserialize(deserializer)?;
        SessionProfile::new(raw.age, raw.sex).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_boundary_ages() {
        assert!(SessionProfile::new(0, Sex::Male).is_ok());
        assert!(SessionProfile::new(120, Sex::Female).is_ok());
        assert_eq!(
            SessionProfile::new(121, Sex::Female),
            Err(ProfileError::AgeOutOfRange(121))
        );
    }

    #[test]
    fn parses_intake_strings() {
        let p = SessionProfile::parse(" 34 ", "Female").unwrap();
        assert_eq!(p.age(), 34);
        assert_eq!(p.sex(), Sex::Female);

        assert_eq!(SessionProfile::parse("", "male"), Err(ProfileError::MissingAge));
        assert_eq!(SessionProfile::parse("30", ""), Err(ProfileError::MissingSex));
        assert_eq!(
            SessionProfile::parse("-4", "male"),
            Err(ProfileError::AgeOutOfRange(-4))
        );
        assert!(matches!(
            SessionProfile::parse("thirty", "male"),
            Err(ProfileError::InvalidAge(_))
        ));
        assert!(matches!(
            SessionProfile::parse("30", "other"),
            Err(ProfileError::UnknownSex(_))
        ));
    }

    #[test]
    fn deserialization_validates() {
        let ok: SessionProfile = serde_json::from_str(r#"{"age":25,"sex":"male"}"#).unwrap();
        assert_eq!(ok.age(), 25);
        let bad = serde_json::from_str::<SessionProfile>(r#"{"age":200,"sex":"male"}"#);
        assert!(bad.is_err());
    }
}
