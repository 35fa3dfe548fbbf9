//! Completed survey submissions and admin annotations.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::record::{AnswerRecord, FieldId, FieldValue};
use super::{ClimateItem, Question, Rating, Sector, Skill};

/// Current version of the persisted submission layout.
pub const SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Accept ids written as strings or as numbers (millisecond timestamps).
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(id) => id,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Feedback about the respondent's management.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagementFeedback {
    /// Free-text feedback.
    #[serde(alias = "feedbackGestao")]
    pub feedback: String,
    /// Rating of management on the 1-5 scale.
    #[serde(alias = "notaGestao")]
    pub rating: Option<Rating>,
}

/// One employee's completed self-evaluation.
///
/// Submissions are created once, when the wizard finishes, and are never
/// modified afterwards. Field aliases accept the camel-cased names written by
/// older clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Version of the persisted layout.
    #[serde(default = "default_schema_version", alias = "schemaVersion")]
    pub schema_version: u32,

    /// Identifier assigned by the store.
    #[serde(default, deserialize_with = "id_from_string_or_number")]
    pub id: String,

    /// When the store accepted the submission.
    #[serde(alias = "dataCriacao", alias = "createdAt")]
    pub created_at: DateTime<Utc>,

    /// Respondent name.
    #[serde(alias = "nome")]
    pub name: String,

    /// Respondent sector.
    #[serde(alias = "setor")]
    pub sector: Sector,

    /// Free-text answers.
    #[serde(default, alias = "respostas")]
    pub answers: BTreeMap<Question, String>,

    /// Selected pressure-response options.
    #[serde(default, alias = "reacaoPressao")]
    pub pressure_response: Vec<String>,

    /// Skill ratings.
    #[serde(default, alias = "competencias")]
    pub skills: BTreeMap<Skill, Rating>,

    /// Management feedback.
    #[serde(default, alias = "gestao")]
    pub management: ManagementFeedback,

    /// Climate answers on the 1-5 scale.
    #[serde(default, alias = "clima")]
    pub climate: BTreeMap<ClimateItem, Rating>,

    /// Optional suggestions.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "sugestoes")]
    pub suggestions: Option<String>,

    /// Mean of the numeric answers, computed when the wizard completes.
    #[serde(default, alias = "pontuacaoGeral")]
    pub overall_score: f64,
}

/// A record failed schema validation at the wizard-to-store boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or missing fields: {}", join_keys(.fields))]
pub struct SchemaViolation {
    /// Fields that are missing or hold values outside their domain.
    pub fields: Vec<FieldId>,
}

fn join_keys(fields: &[FieldId]) -> String {
    fields
        .iter()
        .map(|f| f.key())
        .collect::<Vec<_>>()
        .join(", ")
}

impl Submission {
    /// Validate a complete answer record and build a submission from it.
    ///
    /// The id is left empty and the timestamp is provisional; both are
    /// assigned by the store on append. The overall score starts at 0.
    ///
    /// # Errors
    ///
    /// Returns every required field that is missing or invalid.
    pub fn from_record(record: &AnswerRecord) -> Result<Self, SchemaViolation> {
        let mut invalid = Vec::new();

        let name = record.text(FieldId::Name).map(str::to_string);
        if name.is_none() {
            invalid.push(FieldId::Name);
        }

        let sector = record
            .text(FieldId::Sector)
            .and_then(|s| s.parse::<Sector>().ok());
        if sector.is_none() {
            invalid.push(FieldId::Sector);
        }

        let mut answers = BTreeMap::new();
        for question in Question::ALL {
            match record.text(FieldId::Answer(question)) {
                Some(text) => {
                    answers.insert(question, text.to_string());
                }
                None => invalid.push(FieldId::Answer(question)),
            }
        }

        let pressure_response = record
            .get(FieldId::PressureResponse)
            .map(FieldValue::choices)
            .unwrap_or_default();
        if pressure_response.is_empty() {
            invalid.push(FieldId::PressureResponse);
        }

        let mut skills = BTreeMap::new();
        for skill in Skill::ALL {
            let field = FieldId::Skill(skill);
            match record.get(field).filter(|v| field.accepts(v)).and_then(FieldValue::as_rating) {
                Some(rating) => {
                    skills.insert(skill, rating);
                }
                None => invalid.push(field),
            }
        }

        let feedback = record.text(FieldId::ManagementFeedback).map(str::to_string);
        if feedback.is_none() {
            invalid.push(FieldId::ManagementFeedback);
        }
        let management_rating = record.get(FieldId::ManagementRating).and_then(FieldValue::as_scale);
        if management_rating.is_none() {
            invalid.push(FieldId::ManagementRating);
        }

        let mut climate = BTreeMap::new();
        for item in ClimateItem::ALL {
            match record.get(FieldId::Climate(item)).and_then(FieldValue::as_scale) {
                Some(value) => {
                    climate.insert(item, Rating::from(value));
                }
                None => invalid.push(FieldId::Climate(item)),
            }
        }

        match (name, sector, feedback) {
            (Some(name), Some(sector), Some(feedback)) if invalid.is_empty() => Ok(Self {
                schema_version: SCHEMA_VERSION,
                id: String::new(),
                created_at: Utc::now(),
                name,
                sector,
                answers,
                pressure_response,
                skills,
                management: ManagementFeedback {
                    feedback,
                    rating: management_rating.map(Rating::from),
                },
                climate,
                suggestions: record.text(FieldId::Suggestions).map(str::to_string),
                overall_score: 0.0,
            }),
            _ => Err(SchemaViolation { fields: invalid }),
        }
    }

    /// Score of one skill on the 1-5 scale, if rated and mapped.
    #[must_use]
    pub fn skill_score(&self, skill: Skill) -> Option<u8> {
        self.skills.get(&skill).and_then(Rating::score)
    }

    /// Score of one climate item on the 1-5 scale, if answered and mapped.
    #[must_use]
    pub fn climate_score(&self, item: ClimateItem) -> Option<u8> {
        self.climate.get(&item).and_then(Rating::score)
    }

    /// Identifier used to key admin annotations for this respondent.
    #[must_use]
    pub fn annotation_key(&self) -> &str {
        &self.id
    }
}

/// An admin's comment about one respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// The comment text.
    pub comment: String,
    /// When the comment was last written.
    #[serde(alias = "data")]
    pub date: DateTime<Utc>,
    /// Who wrote it.
    #[serde(alias = "autor")]
    pub author: String,
}
