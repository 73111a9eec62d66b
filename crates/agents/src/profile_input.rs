use std::collections::BTreeSet;

use prayaas_core::{
    HealthCondition, IncomeRange, InsuranceType, Language, Occupation, UserProfile, AGE_RANGE,
    FAMILY_RANGE,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("age {0} is outside {min}..={max}", min = AGE_RANGE.start(), max = AGE_RANGE.end())]
    AgeOutOfRange(i64),
    #[error("family size {0} is outside {min}..={max}", min = FAMILY_RANGE.start(), max = FAMILY_RANGE.end())]
    FamilyOutOfRange(i64),
    #[error("unknown {field} value `{value}`")]
    UnknownLabel { field: &'static str, value: String },
}

/// Raw profile as captured by a form, request body or command line. Labels may be
/// given as codes or display labels; missing fields take the default profile's values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileInput {
    pub age: i64,
    pub income_range: String,
    pub occupation: String,
    pub family_members: i64,
    pub existing_insurance: Vec<String>,
    pub health_conditions: Vec<String>,
    pub language: String,
}

impl Default for ProfileInput {
    fn default() -> Self {
        Self::from(&UserProfile::default())
    }
}

impl From<&UserProfile> for ProfileInput {
    fn from(profile: &UserProfile) -> Self {
        Self {
            age: i64::from(profile.age),
            income_range: profile.income_range.code().to_string(),
            occupation: profile.occupation.code().to_string(),
            family_members: i64::from(profile.family_members),
            existing_insurance: profile
                .existing_insurance
                .iter()
                .map(|kind| kind.code().to_string())
                .collect(),
            health_conditions: profile
                .health_conditions
                .iter()
                .map(|condition| condition.code().to_string())
                .collect(),
            language: profile.language.code().to_string(),
        }
    }
}

impl TryFrom<ProfileInput> for UserProfile {
    type Error = ProfileError;

    fn try_from(input: ProfileInput) -> Result<Self, Self::Error> {
        let age = u8::try_from(input.age)
            .ok()
            .filter(|age| AGE_RANGE.contains(age))
            .ok_or(ProfileError::AgeOutOfRange(input.age))?;
        let family_members = u8::try_from(input.family_members)
            .ok()
            .filter(|size| FAMILY_RANGE.contains(size))
            .ok_or(ProfileError::FamilyOutOfRange(input.family_members))?;

        let mut existing_insurance = input
            .existing_insurance
            .iter()
            .map(|value| lookup("existing_insurance", value, InsuranceType::parse))
            .collect::<Result<BTreeSet<_>, _>>()?;
        if existing_insurance.len() > 1 {
            existing_insurance.remove(&InsuranceType::None);
        }

        let mut health_conditions = input
            .health_conditions
            .iter()
            .map(|value| lookup("health_conditions", value, HealthCondition::parse))
            .collect::<Result<BTreeSet<_>, _>>()?;
        if health_conditions.len() > 1 {
            health_conditions.remove(&HealthCondition::None);
        }
        if health_conditions.is_empty() {
            health_conditions.insert(HealthCondition::None);
        }

        Ok(UserProfile {
            age,
            income_range: lookup("income_range", &input.income_range, IncomeRange::parse)?,
            occupation: lookup("occupation", &input.occupation, Occupation::parse)?,
            family_members,
            existing_insurance,
            health_conditions,
            language: lookup("language", &input.language, Language::parse)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelOption {
    pub code: &'static str,
    pub label: &'static str,
}

/// Choices a profile form offers, with the default profile pre-filled.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileOptions {
    pub age_min: u8,
    pub age_max: u8,
    pub family_min: u8,
    pub family_max: u8,
    pub income_ranges: Vec<LabelOption>,
    pub occupations: Vec<LabelOption>,
    pub insurance_types: Vec<LabelOption>,
    pub health_conditions: Vec<LabelOption>,
    pub languages: Vec<LabelOption>,
    pub defaults: ProfileInput,
}

impl ProfileOptions {
    pub fn catalog() -> Self {
        Self {
            age_min: *AGE_RANGE.start(),
            age_max: *AGE_RANGE.end(),
            family_min: *FAMILY_RANGE.start(),
            family_max: *FAMILY_RANGE.end(),
            income_ranges: options(IncomeRange::ALL, IncomeRange::code, IncomeRange::label),
            occupations: options(Occupation::ALL, Occupation::code, Occupation::label),
            insurance_types: options(InsuranceType::ALL, InsuranceType::code, InsuranceType::label),
            health_conditions: options(
                HealthCondition::ALL,
                HealthCondition::code,
                HealthCondition::label,
            ),
            languages: options(Language::ALL, Language::code, Language::label),
            defaults: ProfileInput::default(),
        }
    }
}

fn options<T: Copy>(
    all: &[T],
    code: fn(T) -> &'static str,
    label: fn(T) -> &'static str,
) -> Vec<LabelOption> {
    all.iter()
        .map(|&value| LabelOption {
            code: code(value),
            label: label(value),
        })
        .collect()
}

fn lookup<T>(
    field: &'static str,
    value: &str,
    parse: fn(&str) -> Option<T>,
) -> Result<T, ProfileError> {
    parse(value).ok_or_else(|| ProfileError::UnknownLabel {
        field,
        value: value.to_string(),
    })
}
