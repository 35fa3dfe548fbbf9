//! The in-progress answer record filled in by the wizard.
//!
//! Fields are addressed by [`FieldId`], an explicit enumeration of every
//! input the survey collects. Values are merged as the respondent types and
//! are only checked when a screen is validated or when the record is turned
//! into a [`Submission`](super::Submission).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use super::{ClimateItem, Question, Rating, Sector, Skill, SCALE_MAX, SCALE_MIN};
use crate::error::{Error, Result};

/// Identifier of a single survey input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    /// Respondent name.
    Name,
    /// Respondent sector.
    Sector,
    /// A free-text answer.
    Answer(Question),
    /// The "how do you react under pressure" multi-select.
    PressureResponse,
    /// A skill rating.
    Skill(Skill),
    /// Free-text feedback about management.
    ManagementFeedback,
    /// Rating of management on the 1-5 scale.
    ManagementRating,
    /// A climate item on the 1-5 scale.
    Climate(ClimateItem),
    /// Optional suggestions.
    Suggestions,
}

impl FieldId {
    /// Storage key of the field.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "nome",
            Self::Sector => "setor",
            Self::Answer(question) => question.key(),
            Self::PressureResponse => "reacao_pressao",
            Self::Skill(skill) => skill.key(),
            Self::ManagementFeedback => "feedback_gestao",
            Self::ManagementRating => "nota_gestao",
            Self::Climate(item) => item.key(),
            Self::Suggestions => "sugestoes",
        }
    }

    /// Every field the survey knows about, in screen order.
    #[must_use]
    pub fn all() -> Vec<Self> {
        let mut fields = vec![Self::Name, Self::Sector];
        fields.extend(Question::ALL.map(Self::Answer));
        fields.push(Self::PressureResponse);
        fields.extend(Skill::ALL.map(Self::Skill));
        fields.push(Self::ManagementFeedback);
        fields.push(Self::ManagementRating);
        fields.extend(ClimateItem::ALL.map(Self::Climate));
        fields.push(Self::Suggestions);
        fields
    }

    /// Whether `value` is an acceptable, non-empty answer for this field.
    #[must_use]
    pub fn accepts(self, value: &FieldValue) -> bool {
        match self {
            Self::Name | Self::Answer(_) | Self::ManagementFeedback | Self::Suggestions => {
                value.as_text().is_some_and(|t| !t.trim().is_empty())
            }
            Self::Sector => value
                .as_text()
                .is_some_and(|t| t.parse::<Sector>().is_ok()),
            Self::PressureResponse => !value.choices().is_empty(),
            Self::Skill(_) => value.as_rating().and_then(|r| r.score()).is_some(),
            Self::ManagementRating | Self::Climate(_) => value.as_scale().is_some(),
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FieldId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim();
        Self::all()
            .into_iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| Error::UnknownField {
                key: key.to_string(),
            })
    }
}

impl Serialize for FieldId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

/// A raw value typed into the survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A number, e.g. a climate score.
    Number(f64),
    /// Free text, a sector name or a rating label.
    Text(String),
    /// Selected options of a multi-select.
    Choices(Vec<String>),
}

impl FieldValue {
    /// The value as text, if it is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The value coerced to a number; text is parsed, choices never coerce.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Text(text) => text.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// The value as an integer on the 1-5 scale.
    #[must_use]
    pub fn as_scale(&self) -> Option<u8> {
        let n = self.as_number()?;
        if n.fract() != 0.0 || n < f64::from(SCALE_MIN) || n > f64::from(SCALE_MAX) {
            return None;
        }
        u8::try_from(n as i64).ok()
    }

    /// The value as a stored rating.
    #[must_use]
    pub fn as_rating(&self) -> Option<Rating> {
        match self {
            Self::Number(_) => self.as_scale().map(Rating::from),
            Self::Text(text) if !text.trim().is_empty() => Some(Rating::Label(text.trim().to_string())),
            _ => None,
        }
    }

    /// Non-blank selected options; a single text value counts as one choice.
    #[must_use]
    pub fn choices(&self) -> Vec<String> {
        match self {
            Self::Choices(items) => items
                .iter()
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect(),
            Self::Text(text) if !text.trim().is_empty() => vec![text.trim().to_string()],
            _ => Vec::new(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u8> for FieldValue {
    fn from(value: u8) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::Choices(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        Self::Choices(value.into_iter().map(str::to_string).collect())
    }
}

/// Answers collected so far, keyed by field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerRecord {
    values: BTreeMap<FieldId, FieldValue>,
}

impl AnswerRecord {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a record from a JSON object of `key: value` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object, a key is not a known
    /// field, or a value is not a number, string or array of strings.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(map) = value else {
            return Err(Error::InvalidAnswers {
                message: "answers must be a JSON object".to_string(),
            });
        };

        let mut record = Self::new();
        for (key, raw) in map {
            let field: FieldId = key.parse()?;
            let value: FieldValue = serde_json::from_value(raw).map_err(|e| Error::InvalidAnswers {
                message: format!("{key}: {e}"),
            })?;
            record.set(field, value);
        }
        Ok(record)
    }

    /// Set or overwrite a field.
    pub fn set(&mut self, field: FieldId, value: impl Into<FieldValue>) {
        self.values.insert(field, value.into());
    }

    /// Remove a field, returning its previous value.
    pub fn clear(&mut self, field: FieldId) -> Option<FieldValue> {
        self.values.remove(&field)
    }

    /// Get a field's value.
    #[must_use]
    pub fn get(&self, field: FieldId) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    /// Get a field's value as trimmed, non-empty text.
    #[must_use]
    pub fn text(&self, field: FieldId) -> Option<&str> {
        self.get(field)
            .and_then(FieldValue::as_text)
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Whether the field holds an acceptable answer.
    #[must_use]
    pub fn is_answered(&self, field: FieldId) -> bool {
        self.get(field).is_some_and(|value| field.accepts(value))
    }

    /// Copy every value of `other` into this record, overwriting.
    pub fn merge(&mut self, other: &AnswerRecord) {
        for (field, value) in &other.values {
            self.values.insert(*field, value.clone());
        }
    }

    /// Mean of `fields` coerced to numbers, ignoring non-numeric entries.
    ///
    /// Returns 0 when none of the fields hold a number.
    #[must_use]
    pub fn numeric_mean(&self, fields: &[FieldId]) -> f64 {
        let numbers: Vec<f64> = fields
            .iter()
            .filter_map(|field| self.get(*field).and_then(FieldValue::as_number))
            .collect();
        if numbers.is_empty() {
            0.0
        } else {
            numbers.iter().sum::<f64>() / numbers.len() as f64
        }
    }

    /// Number of fields set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the set fields.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &FieldValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }
}
