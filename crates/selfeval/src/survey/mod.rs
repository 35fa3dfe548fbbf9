//! Survey vocabulary for selfeval.
//!
//! This module defines the fixed enumerations the survey is built from:
//! organizational sectors, rated skills, free-text questions, climate items
//! and the ordinal rating scale. Every enumeration has a stable storage key
//! and a human-readable label.

pub mod record;
pub mod submission;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::Error;

pub use record::{AnswerRecord, FieldId, FieldValue};
pub use submission::{Annotation, ManagementFeedback, SchemaViolation, Submission, SCHEMA_VERSION};

/// Lowest value on the 1-5 scale.
pub const SCALE_MIN: u8 = 1;

/// Highest value on the 1-5 scale.
pub const SCALE_MAX: u8 = 5;

/// Score used for a missing rating when the neutral policy is selected.
pub const NEUTRAL_SCORE: u8 = 3;

/// Options offered by the "pressure response" multi-select.
pub const PRESSURE_RESPONSE_OPTIONS: &[&str] = &[
    "mantenho_a_calma",
    "priorizo_tarefas",
    "peco_ajuda",
    "trabalho_horas_extras",
    "fico_ansioso",
];

/// Organizational department of a respondent.
///
/// Serialized with its accented label; parsing accepts any casing and
/// accepts labels with or without accents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sector {
    /// Accounting.
    Contabil,
    /// Tax bookkeeping.
    Fiscal,
    /// Tax planning and litigation.
    Tributario,
    /// Payroll and personnel.
    DepartamentoPessoal,
    /// Corporate registrations.
    Societario,
    /// Back office.
    Administrativo,
}

impl Sector {
    /// All sectors, in enumeration order.
    pub const ALL: [Sector; 6] = [
        Self::Contabil,
        Self::Fiscal,
        Self::Tributario,
        Self::DepartamentoPessoal,
        Self::Societario,
        Self::Administrativo,
    ];

    /// Display label, as persisted.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Contabil => "Contábil",
            Self::Fiscal => "Fiscal",
            Self::Tributario => "Tributário",
            Self::DepartamentoPessoal => "Departamento Pessoal",
            Self::Societario => "Societário",
            Self::Administrativo => "Administrativo",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Sector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = fold(s);
        Self::ALL
            .into_iter()
            .find(|sector| {
                let label = fold(sector.label());
                label == wanted || label.replace(' ', "_") == wanted
            })
            .ok_or_else(|| Error::UnknownSector {
                value: s.to_string(),
            })
    }
}

impl TryFrom<String> for Sector {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Sector> for String {
    fn from(sector: Sector) -> Self {
        sector.label().to_string()
    }
}

/// Which rating table a skill belongs to on the skills screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkillTable {
    /// Technical competencies.
    Technical,
    /// Behavioral competencies.
    Behavioral,
}

/// A rated competency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    /// Technical knowledge.
    #[serde(alias = "conhecimentoTecnico")]
    ConhecimentoTecnico,
    /// Organization.
    Organizacao,
    /// Productivity.
    Produtividade,
    /// Quality of deliverables.
    #[serde(alias = "qualidadeEntregas")]
    QualidadeEntregas,
    /// Communication.
    Comunicacao,
    /// Teamwork.
    #[serde(alias = "trabalhoEquipe")]
    TrabalhoEquipe,
    /// Proactivity.
    Proatividade,
    /// Time management.
    #[serde(alias = "gestaoTempo")]
    GestaoTempo,
}

impl Skill {
    /// All skills, in enumeration order.
    pub const ALL: [Skill; 8] = [
        Self::ConhecimentoTecnico,
        Self::Organizacao,
        Self::Produtividade,
        Self::QualidadeEntregas,
        Self::Comunicacao,
        Self::TrabalhoEquipe,
        Self::Proatividade,
        Self::GestaoTempo,
    ];

    /// Storage key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::ConhecimentoTecnico => "conhecimento_tecnico",
            Self::Organizacao => "organizacao",
            Self::Produtividade => "produtividade",
            Self::QualidadeEntregas => "qualidade_entregas",
            Self::Comunicacao => "comunicacao",
            Self::TrabalhoEquipe => "trabalho_equipe",
            Self::Proatividade => "proatividade",
            Self::GestaoTempo => "gestao_tempo",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ConhecimentoTecnico => "Conhecimento Técnico",
            Self::Organizacao => "Organização",
            Self::Produtividade => "Produtividade",
            Self::QualidadeEntregas => "Qualidade das Entregas",
            Self::Comunicacao => "Comunicação",
            Self::TrabalhoEquipe => "Trabalho em Equipe",
            Self::Proatividade => "Proatividade",
            Self::GestaoTempo => "Gestão do Tempo",
        }
    }

    /// The rating table this skill appears in.
    #[must_use]
    pub const fn table(self) -> SkillTable {
        match self {
            Self::ConhecimentoTecnico
            | Self::Organizacao
            | Self::Produtividade
            | Self::QualidadeEntregas => SkillTable::Technical,
            Self::Comunicacao | Self::TrabalhoEquipe | Self::Proatividade | Self::GestaoTempo => {
                SkillTable::Behavioral
            }
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A free-text question on the skills screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Question {
    /// What the respondent does best.
    PontosFortes,
    /// What the respondent wants to improve.
    PontosMelhoria,
    /// Biggest achievement of the period.
    MaiorConquista,
    /// Biggest challenge of the period.
    MaiorDesafio,
    /// Goals for the next period.
    Metas,
    /// Support the respondent needs.
    ApoioNecessario,
}

impl Question {
    /// All questions, in screen order.
    pub const ALL: [Question; 6] = [
        Self::PontosFortes,
        Self::PontosMelhoria,
        Self::MaiorConquista,
        Self::MaiorDesafio,
        Self::Metas,
        Self::ApoioNecessario,
    ];

    /// Storage key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::PontosFortes => "pontos_fortes",
            Self::PontosMelhoria => "pontos_melhoria",
            Self::MaiorConquista => "maior_conquista",
            Self::MaiorDesafio => "maior_desafio",
            Self::Metas => "metas",
            Self::ApoioNecessario => "apoio_necessario",
        }
    }
}

/// An item of the climate collection screen, answered on the 1-5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimateItem {
    /// Overall satisfaction with the organization.
    SatisfacaoGeral,
    /// Relationship with the team.
    RelacionamentoEquipe,
    /// Recognition received.
    Reconhecimento,
    /// Internal communication.
    ComunicacaoInterna,
    /// Work environment.
    AmbienteTrabalho,
}

impl ClimateItem {
    /// All climate items, in screen order.
    pub const ALL: [ClimateItem; 5] = [
        Self::SatisfacaoGeral,
        Self::RelacionamentoEquipe,
        Self::Reconhecimento,
        Self::ComunicacaoInterna,
        Self::AmbienteTrabalho,
    ];

    /// Storage key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::SatisfacaoGeral => "satisfacao_geral",
            Self::RelacionamentoEquipe => "relacionamento_equipe",
            Self::Reconhecimento => "reconhecimento",
            Self::ComunicacaoInterna => "comunicacao_interna",
            Self::AmbienteTrabalho => "ambiente_trabalho",
        }
    }
}

/// The categorical rating scale, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingLevel {
    /// Score 1.
    MuitoInsatisfatorio,
    /// Score 2.
    Insatisfatorio,
    /// Score 3.
    Neutro,
    /// Score 4.
    Satisfatorio,
    /// Score 5.
    Excelente,
}

impl RatingLevel {
    /// All levels, lowest first.
    pub const ALL: [RatingLevel; 5] = [
        Self::MuitoInsatisfatorio,
        Self::Insatisfatorio,
        Self::Neutro,
        Self::Satisfatorio,
        Self::Excelente,
    ];

    /// Storage label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MuitoInsatisfatorio => "muito_insatisfatorio",
            Self::Insatisfatorio => "insatisfatorio",
            Self::Neutro => "neutro",
            Self::Satisfatorio => "satisfatorio",
            Self::Excelente => "excelente",
        }
    }

    /// Position on the 1-5 scale.
    #[must_use]
    pub const fn score(self) -> u8 {
        match self {
            Self::MuitoInsatisfatorio => 1,
            Self::Insatisfatorio => 2,
            Self::Neutro => 3,
            Self::Satisfatorio => 4,
            Self::Excelente => 5,
        }
    }

    /// Parse a label, ignoring case, accents and space/underscore differences.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = fold(label).replace(' ', "_");
        Self::ALL.into_iter().find(|level| level.as_str() == wanted)
    }

    /// The level at a given scale position.
    #[must_use]
    pub fn from_score(score: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.score() == score)
    }
}

impl fmt::Display for RatingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored rating: either a numeric scale value or a categorical label.
///
/// Ratings are kept as written so that records from older writers load
/// unchanged; [`Rating::score`] maps them onto the 1-5 scale. Values of any
/// other shape (`null`, fractions, arrays) load as [`Rating::Unmapped`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Rating {
    /// A number on the 1-5 scale.
    Numeric(i64),
    /// A categorical label such as `"excelente"`, or a number written as text.
    Label(String),
    /// A value with no place on the scale. Serialized as `null`.
    Unmapped,
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| Self::from_value(&value))
    }
}

impl Rating {
    /// Interpret an arbitrary JSON value as a rating.
    ///
    /// Integral floats such as `4.0` are treated as integers.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() <= 1e15)
                        .map(|f| f as i64)
                })
                .map_or(Self::Unmapped, Self::Numeric),
            Value::String(label) => Self::Label(label.clone()),
            _ => Self::Unmapped,
        }
    }

    /// Map the rating onto the 1-5 scale, or `None` if it is unmapped.
    #[must_use]
    pub fn score(&self) -> Option<u8> {
        match self {
            Self::Numeric(n) => scale_value(*n),
            Self::Label(label) => RatingLevel::from_label(label)
                .map(RatingLevel::score)
                .or_else(|| label.trim().parse::<i64>().ok().and_then(scale_value)),
            Self::Unmapped => None,
        }
    }

    /// The categorical level for this rating, if mapped.
    #[must_use]
    pub fn level(&self) -> Option<RatingLevel> {
        self.score().and_then(RatingLevel::from_score)
    }
}

impl From<RatingLevel> for Rating {
    fn from(level: RatingLevel) -> Self {
        Self::Label(level.as_str().to_string())
    }
}

impl From<u8> for Rating {
    fn from(value: u8) -> Self {
        Self::Numeric(i64::from(value))
    }
}

fn scale_value(n: i64) -> Option<u8> {
    u8::try_from(n)
        .ok()
        .filter(|v| (SCALE_MIN..=SCALE_MAX).contains(v))
}

/// Lowercase and strip Portuguese diacritics for lenient comparisons.
pub(crate) fn fold(s: &str) -> String {
    s.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}
