//! The ordered screen table driving the wizard.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::survey::{AnswerRecord, ClimateItem, FieldId, Question, Skill};

/// One screen of the survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Greeting shown before anything else.
    Welcome,
    /// Explains how the evaluation works.
    Presentation,
    /// Respondent data, open questions and the two skill tables.
    Skills,
    /// Feedback about management.
    Management,
    /// Organizational climate.
    Climate,
    /// Thank-you screen shown after submission.
    Confirmation,
}

impl Screen {
    /// Title shown for the screen.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Welcome => "Bem-vindo",
            Self::Presentation => "Apresentação",
            Self::Skills => "Autoavaliação",
            Self::Management => "Feedback da Gestão",
            Self::Climate => "Clima Organizacional",
            Self::Confirmation => "Avaliação Enviada",
        }
    }

    /// Whether this is the terminal screen.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmation)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Where the wizard starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPoint {
    /// Start at the welcome screen.
    #[default]
    Welcome,
    /// Skip the welcome screen and start at the presentation.
    Direct,
}

/// Computes the missing fields of a screen.
pub type Validator = fn(&ScreenDescriptor, &AnswerRecord) -> Vec<FieldId>;

/// A screen together with its required fields and validator.
#[derive(Clone)]
pub struct ScreenDescriptor {
    /// The screen.
    pub screen: Screen,
    /// Fields that must hold an acceptable value before leaving the screen.
    pub required: Vec<FieldId>,
    validator: Validator,
}

impl fmt::Debug for ScreenDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScreenDescriptor")
            .field("screen", &self.screen)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

impl ScreenDescriptor {
    /// A screen with no required fields.
    #[must_use]
    pub fn informational(screen: Screen) -> Self {
        Self {
            screen,
            required: Vec::new(),
            validator: nothing_required,
        }
    }

    /// A screen whose listed fields must all be answered.
    #[must_use]
    pub fn form(screen: Screen, required: Vec<FieldId>) -> Self {
        Self {
            screen,
            required,
            validator: require_all,
        }
    }

    /// Every required field that is absent or invalid, in declaration order.
    #[must_use]
    pub fn missing_fields(&self, record: &AnswerRecord) -> Vec<FieldId> {
        (self.validator)(self, record)
    }
}

/// Validator reporting every required field without an acceptable value.
#[must_use]
pub fn require_all(descriptor: &ScreenDescriptor, record: &AnswerRecord) -> Vec<FieldId> {
    descriptor
        .required
        .iter()
        .copied()
        .filter(|field| !record.is_answered(*field))
        .collect()
}

/// Validator for screens that collect nothing.
#[must_use]
pub fn nothing_required(_descriptor: &ScreenDescriptor, _record: &AnswerRecord) -> Vec<FieldId> {
    Vec::new()
}

fn skills_fields() -> Vec<FieldId> {
    let mut fields = vec![FieldId::Name, FieldId::Sector];
    fields.extend(Question::ALL.map(FieldId::Answer));
    fields.push(FieldId::PressureResponse);
    fields.extend(Skill::ALL.map(FieldId::Skill));
    fields
}

/// The screen table for an entry point.
#[must_use]
pub fn screens(entry: EntryPoint) -> Vec<ScreenDescriptor> {
    let mut table = Vec::with_capacity(6);
    if entry == EntryPoint::Welcome {
        table.push(ScreenDescriptor::informational(Screen::Welcome));
    }
    table.push(ScreenDescriptor::informational(Screen::Presentation));
    table.push(ScreenDescriptor::form(Screen::Skills, skills_fields()));
    table.push(ScreenDescriptor::form(
        Screen::Management,
        vec![FieldId::ManagementFeedback, FieldId::ManagementRating],
    ));
    table.push(ScreenDescriptor::form(
        Screen::Climate,
        ClimateItem::ALL.map(FieldId::Climate).to_vec(),
    ));
    table.push(ScreenDescriptor::informational(Screen::Confirmation));
    table
}
