//! Deterministic sample data for tests and local demos.
//!
//! Nothing here is used by the aggregation engine itself; the report's empty
//! state is handled by [`crate::report::demo`].

use chrono::{DateTime, Duration, Utc};

use crate::survey::{
    AnswerRecord, ClimateItem, FieldId, Question, RatingLevel, Sector, Skill, Submission,
    PRESSURE_RESPONSE_OPTIONS,
};

const NAMES: &[&str] = &[
    "Ana Souza",
    "Bruno Lima",
    "Carla Mendes",
    "Diego Rocha",
    "Elisa Prado",
    "Fábio Nunes",
    "Gabriela Reis",
    "Heitor Alves",
];

/// Base timestamp of seeded submissions: 2024-01-01T00:00:00Z.
const SEED_EPOCH_SECS: i64 = 1_704_067_200;

/// A complete, valid answer record. Varies deterministically with `index`.
#[must_use]
pub fn sample_record(index: usize) -> AnswerRecord {
    let mut record = AnswerRecord::new();
    record.set(FieldId::Name, NAMES[index % NAMES.len()]);
    record.set(FieldId::Sector, Sector::ALL[index % Sector::ALL.len()].label());

    for question in Question::ALL {
        record.set(
            FieldId::Answer(question),
            format!("Resposta de exemplo para {}", question.key()),
        );
    }

    let pressure = PRESSURE_RESPONSE_OPTIONS[index % PRESSURE_RESPONSE_OPTIONS.len()];
    record.set(FieldId::PressureResponse, vec![pressure]);

    for (offset, skill) in Skill::ALL.into_iter().enumerate() {
        // Levels cycle through neutro, satisfatorio and excelente.
        let level = RatingLevel::ALL[2 + (index + offset) % 3];
        record.set(FieldId::Skill(skill), level.as_str());
    }

    record.set(
        FieldId::ManagementFeedback,
        "Gestão acessível e com bom retorno",
    );
    record.set(FieldId::ManagementRating, scale_value(index, 0));

    for (offset, item) in ClimateItem::ALL.into_iter().enumerate() {
        record.set(FieldId::Climate(item), scale_value(index, offset + 1));
    }

    record
}

/// `count` valid submissions spread across every sector.
///
/// Ids and timestamps are filled in deterministically so the data can be
/// compared in tests; a store assigns fresh ones on append.
#[must_use]
pub fn sample_submissions(count: usize) -> Vec<Submission> {
    (0..count)
        .filter_map(|index| {
            let record = sample_record(index);
            let mut submission = Submission::from_record(&record).ok()?;
            submission.id = format!("seed-{index:04}");
            submission.created_at = seed_timestamp(index);
            submission.overall_score = record.numeric_mean(&crate::wizard::SCORED_FIELDS);
            Some(submission)
        })
        .collect()
}

fn scale_value(index: usize, offset: usize) -> u8 {
    // 2..=5, never 1, so seeded data reads as a mostly positive survey.
    u8::try_from(2 + (index + offset) % 4).unwrap_or(3)
}

fn seed_timestamp(index: usize) -> DateTime<Utc> {
    let base = DateTime::from_timestamp(SEED_EPOCH_SECS, 0).unwrap_or_default();
    base + Duration::hours(i64::try_from(index).unwrap_or(0))
}
