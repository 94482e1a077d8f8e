//! Per-request patient context

use crate::knowledge::CancerType;
use serde::{Deserialize, Deserializer, Serialize};

/// Patient gender as reported by the client. Matching is exact and
/// case-sensitive; anything other than `male`/`female`/empty is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    #[default]
    Unspecified,
    Male,
    Female,
    Other(String),
}

impl Gender {
    pub fn as_str(&self) -> &str {
        match self {
            Gender::Unspecified => "",
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other(s) => s,
        }
    }
}

impl From<&str> for Gender {
    fn from(s: &str) -> Self {
        match s {
            "" => Gender::Unspecified,
            "male" => Gender::Male,
            "female" => Gender::Female,
            other => Gender::Other(other.to_string()),
        }
    }
}

impl From<String> for Gender {
    fn from(s: String) -> Self {
        match s.as_str() {
            "" | "male" | "female" => Gender::from(s.as_str()),
            _ => Gender::Other(s),
        }
    }
}

impl From<Gender> for String {
    fn from(g: Gender) -> Self {
        match g {
            Gender::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// Accepts an integer or fractional age, floored to whole years.
///
/// Every age rule is an inclusive lower bound on whole years, so flooring
/// never changes which rules fire.
pub fn deserialize_age<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Age {
        Whole(i64),
        Fractional(f64),
    }

    Ok(match Option::<Age>::deserialize(deserializer)? {
        Some(Age::Whole(years)) => Some(years),
        Some(Age::Fractional(years)) => Some(years.floor() as i64),
        None => None,
    })
}

/// Optional patient details supplied with a query.
///
/// Missing fields default to age 0, unspecified gender and no cancer type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    #[serde(default, deserialize_with = "deserialize_age")]
    pub age: Option<i64>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub cancer_type: Option<String>,
}

impl UserContext {
    pub fn new(age: i64, gender: impl Into<String>) -> Self {
        Self {
            age: Some(age),
            gender: Some(gender.into()),
            cancer_type: None,
        }
    }

    /// A context with no fields carries no information and counts as absent
    pub fn is_empty(&self) -> bool {
        self.age.is_none() && self.gender.is_none() && self.cancer_type.is_none()
    }

    pub fn age(&self) -> i64 {
        self.age.unwrap_or(0)
    }

    pub fn gender(&self) -> Gender {
        self.gender.as_deref().map(Gender::from).unwrap_or_default()
    }

    /// Declared cancer type; unknown keys resolve to none
    pub fn cancer_type(&self) -> Option<CancerType> {
        self.cancer_type.as_deref().and_then(CancerType::from_key)
    }
}
