//! The survey wizard: a table-driven state machine over [`screens`].
//!
//! The wizard holds a 1-based step index and the answer record being filled
//! in. Edits are merged into the record immediately; validation only runs on
//! [`Wizard::advance`]. Leaving the last data screen validates the whole
//! record, stores it and writes a receipt. The confirmation screen that
//! follows is a sink.

pub mod screens;

use std::fmt;

use tracing::{debug, error, info};

use crate::error::Result;
use crate::receipt::{NoopReceiptWriter, ReceiptStatus, ReceiptWriter};
use crate::storage::SubmissionRepository;
use crate::survey::{AnswerRecord, ClimateItem, FieldId, FieldValue, Submission};

pub use screens::{screens, EntryPoint, Screen, ScreenDescriptor};

/// Fields averaged into a submission's overall score.
pub const SCORED_FIELDS: [FieldId; 6] = [
    FieldId::Climate(ClimateItem::SatisfacaoGeral),
    FieldId::Climate(ClimateItem::RelacionamentoEquipe),
    FieldId::Climate(ClimateItem::Reconhecimento),
    FieldId::Climate(ClimateItem::ComunicacaoInterna),
    FieldId::Climate(ClimateItem::AmbienteTrabalho),
    FieldId::ManagementRating,
];

/// Message shown when the store rejects a submission.
pub const SUBMIT_FAILED_MESSAGE: &str =
    "Não foi possível salvar sua avaliação. Tente novamente em instantes.";

/// Result of [`Wizard::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved to the next screen.
    Moved {
        /// New 1-based step.
        step: usize,
        /// New screen.
        screen: Screen,
    },
    /// Required fields are missing; the step is unchanged.
    Blocked {
        /// Every missing or invalid field.
        missing: Vec<FieldId>,
    },
    /// The survey was stored and the wizard moved to the confirmation screen.
    Submitted {
        /// The stored submission, with its assigned id.
        submission: Box<Submission>,
        /// Outcome of writing the receipt.
        receipt: ReceiptStatus,
    },
    /// The store rejected the submission; the step is unchanged.
    SubmitFailed {
        /// User-facing message.
        message: String,
    },
    /// Already on the confirmation screen.
    Finished,
}

/// Drives one respondent through the survey.
pub struct Wizard<'a> {
    table: Vec<ScreenDescriptor>,
    step: usize,
    record: AnswerRecord,
    store: &'a dyn SubmissionRepository,
    receipts: &'a dyn ReceiptWriter,
}

impl fmt::Debug for Wizard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wizard")
            .field("step", &self.step)
            .field("total_steps", &self.table.len())
            .field("screen", &self.screen())
            .field("answered", &self.record.len())
            .finish_non_exhaustive()
    }
}

impl<'a> Wizard<'a> {
    /// Start a survey at step 1 that stores into `store` and writes no
    /// receipts.
    pub fn new(entry: EntryPoint, store: &'a dyn SubmissionRepository) -> Self {
        Self {
            table: screens(entry),
            step: 1,
            record: AnswerRecord::new(),
            store,
            receipts: &NoopReceiptWriter,
        }
    }

    /// Use `receipts` to write a receipt after each submission.
    #[must_use]
    pub fn with_receipts(mut self, receipts: &'a dyn ReceiptWriter) -> Self {
        self.receipts = receipts;
        self
    }

    /// Current 1-based step.
    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Number of screens.
    #[must_use]
    pub fn total_steps(&self) -> usize {
        self.table.len()
    }

    fn descriptor(&self) -> &ScreenDescriptor {
        &self.table[self.step - 1]
    }

    /// Current screen.
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.descriptor().screen
    }

    /// Whether the survey reached the confirmation screen.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.screen().is_terminal()
    }

    /// The answers collected so far.
    #[must_use]
    pub fn record(&self) -> &AnswerRecord {
        &self.record
    }

    /// Missing fields of the current screen.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<FieldId> {
        self.descriptor().missing_fields(&self.record)
    }

    /// Merge one edit into the record, whatever screen is showing.
    pub fn set_field(&mut self, field: FieldId, value: impl Into<FieldValue>) {
        self.record.set(field, value);
    }

    /// Merge one edit addressed by its storage key.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is not a survey field.
    pub fn set(&mut self, key: &str, value: impl Into<FieldValue>) -> Result<()> {
        let field: FieldId = key.parse()?;
        self.set_field(field, value);
        Ok(())
    }

    /// Merge every value of `answers` into the record.
    pub fn fill(&mut self, answers: &AnswerRecord) {
        self.record.merge(answers);
    }

    /// Validate the current screen and move forward.
    pub fn advance(&mut self) -> Advance {
        if self.is_complete() {
            return Advance::Finished;
        }

        let missing = self.missing_fields();
        if !missing.is_empty() {
            debug!(step = self.step, screen = ?self.screen(), missing = missing.len(), "Advance blocked");
            return Advance::Blocked { missing };
        }

        let next = self.step + 1;
        if self.table[next - 1].screen.is_terminal() {
            return self.submit(next);
        }

        self.step = next;
        debug!(step = self.step, screen = ?self.screen(), "Advanced");
        Advance::Moved {
            step: self.step,
            screen: self.screen(),
        }
    }

    fn submit(&mut self, terminal_step: usize) -> Advance {
        let mut submission = match Submission::from_record(&self.record) {
            Ok(submission) => submission,
            Err(violation) => {
                debug!(%violation, "Submission rejected by validation");
                return Advance::Blocked {
                    missing: violation.fields,
                };
            }
        };
        submission.overall_score = self.record.numeric_mean(&SCORED_FIELDS);

        let stored = match self.store.append_one(submission) {
            Ok(stored) => stored,
            Err(err) => {
                error!(error = %err, "Failed to store submission");
                return Advance::SubmitFailed {
                    message: SUBMIT_FAILED_MESSAGE.to_string(),
                };
            }
        };

        self.step = terminal_step;
        info!(id = %stored.id, score = stored.overall_score, "Survey submitted");

        let receipt = ReceiptStatus::from_writer(self.receipts, &stored);
        Advance::Submitted {
            submission: Box::new(stored),
            receipt,
        }
    }

    /// Move back one screen. Returns whether the step changed.
    ///
    /// Does nothing on the first screen and on the confirmation screen.
    pub fn retreat(&mut self) -> bool {
        if self.step <= 1 || self.is_complete() {
            return false;
        }
        self.step -= 1;
        debug!(step = self.step, screen = ?self.screen(), "Retreated");
        true
    }

    /// Start a fresh survey at step 1 with an empty record.
    pub fn reset(&mut self) {
        self.step = 1;
        self.record = AnswerRecord::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::receipt::JsonReceiptWriter;
    use crate::seed;
    use crate::storage::{MemoryKv, MemorySurveyStore, SurveyStore};
    use crate::survey::{Question, Sector, Skill};

    fn walk_to(wizard: &mut Wizard<'_>, screen: Screen) {
        wizard.fill(&seed::sample_record(0));
        while wizard.screen() != screen {
            assert!(matches!(wizard.advance(), Advance::Moved { .. }));
        }
    }

    #[test]
    fn test_new_wizard_starts_at_step_one() {
        let store = MemorySurveyStore::in_memory();
        let wizard = Wizard::new(EntryPoint::Welcome, &store);
        assert_eq!(wizard.step(), 1);
        assert_eq!(wizard.total_steps(), 6);
        assert_eq!(wizard.screen(), Screen::Welcome);

        let direct = Wizard::new(EntryPoint::Direct, &store);
        assert_eq!(direct.total_steps(), 5);
        assert_eq!(direct.screen(), Screen::Presentation);
    }

    #[test]
    fn test_informational_screens_advance_freely() {
        let store = MemorySurveyStore::in_memory();
        let mut wizard = Wizard::new(EntryPoint::Welcome, &store);

        assert_eq!(
            wizard.advance(),
            Advance::Moved {
                step: 2,
                screen: Screen::Presentation
            }
        );
        assert_eq!(
            wizard.advance(),
            Advance::Moved {
                step: 3,
                screen: Screen::Skills
            }
        );
    }

    #[test]
    fn test_blocked_advance_lists_every_missing_field() {
        let store = MemorySurveyStore::in_memory();
        let mut wizard = Wizard::new(EntryPoint::Direct, &store);
        wizard.advance();
        assert_eq!(wizard.screen(), Screen::Skills);

        let Advance::Blocked { missing } = wizard.advance() else {
            panic!("expected a blocked advance");
        };
        assert_eq!(missing.len(), 17);
        assert_eq!(missing[0], FieldId::Name);
        assert!(missing.contains(&FieldId::Skill(Skill::GestaoTempo)));
        assert_eq!(wizard.step(), 2);
    }

    #[test]
    fn test_name_without_sector_blocks_with_setor() {
        let store = MemorySurveyStore::in_memory();
        let mut wizard = Wizard::new(EntryPoint::Welcome, &store);
        wizard.advance();
        wizard.advance();

        let mut record = seed::sample_record(0);
        record.clear(FieldId::Sector);
        wizard.fill(&record);

        let Advance::Blocked { missing } = wizard.advance() else {
            panic!("expected a blocked advance");
        };
        let keys: Vec<&str> = missing.iter().map(|f| f.key()).collect();
        assert_eq!(keys, vec!["setor"]);
        assert_eq!(wizard.screen(), Screen::Skills);
    }

    #[test]
    fn test_invalid_sector_blocks() {
        let store = MemorySurveyStore::in_memory();
        let mut wizard = Wizard::new(EntryPoint::Direct, &store);
        wizard.advance();
        wizard.fill(&seed::sample_record(0));
        wizard.set_field(FieldId::Sector, "Marketing");

        assert_eq!(
            wizard.advance(),
            Advance::Blocked {
                missing: vec![FieldId::Sector]
            }
        );
    }

    #[test]
    fn test_set_by_key() {
        let store = MemorySurveyStore::in_memory();
        let mut wizard = Wizard::new(EntryPoint::Welcome, &store);

        wizard.set("nome", "Ana").unwrap();
        wizard.set("setor", Sector::Fiscal.label()).unwrap();
        assert_eq!(wizard.record().text(FieldId::Name), Some("Ana"));

        let err = wizard.set("idade", "30").unwrap_err();
        assert!(matches!(err, Error::UnknownField { .. }));
    }

    #[test]
    fn test_full_flow_submits_and_stores() {
        let store = MemorySurveyStore::in_memory();
        let mut wizard = Wizard::new(EntryPoint::Welcome, &store);
        walk_to(&mut wizard, Screen::Climate);

        let Advance::Submitted { submission, receipt } = wizard.advance() else {
            panic!("expected a submission");
        };
        assert!(!submission.id.is_empty());
        assert_eq!(receipt, ReceiptStatus::Skipped);
        assert!(wizard.is_complete());
        assert_eq!(wizard.step(), 6);

        let stored = store.load_all();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0], *submission);
    }

    #[test]
    fn test_overall_score_is_mean_of_scored_fields() {
        let store = MemorySurveyStore::in_memory();
        let mut wizard = Wizard::new(EntryPoint::Direct, &store);
        walk_to(&mut wizard, Screen::Climate);
        for field in SCORED_FIELDS {
            wizard.set_field(field, 4u8);
        }
        wizard.set_field(FieldId::ManagementRating, 1u8);

        let Advance::Submitted { submission, .. } = wizard.advance() else {
            panic!("expected a submission");
        };
        assert!((submission.overall_score - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_store_failure_keeps_step() {
        let store = SurveyStore::new(MemoryKv::with_quota(32));
        let mut wizard = Wizard::new(EntryPoint::Welcome, &store);
        walk_to(&mut wizard, Screen::Climate);
        let step = wizard.step();

        assert_eq!(
            wizard.advance(),
            Advance::SubmitFailed {
                message: SUBMIT_FAILED_MESSAGE.to_string()
            }
        );
        assert_eq!(wizard.step(), step);
        assert!(!wizard.record().is_empty());
    }

    #[test]
    fn test_receipt_written_after_submission() {
        let dir = std::env::temp_dir().join(format!("selfeval_wizard_receipt_{}", std::process::id()));
        let writer = JsonReceiptWriter::new(&dir);
        let store = MemorySurveyStore::in_memory();
        let mut wizard = Wizard::new(EntryPoint::Direct, &store).with_receipts(&writer);
        walk_to(&mut wizard, Screen::Climate);

        let Advance::Submitted { submission, receipt } = wizard.advance() else {
            panic!("expected a submission");
        };
        assert_eq!(
            receipt,
            ReceiptStatus::Written(dir.join(format!("{}.json", submission.id)))
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_confirmation_is_a_sink() {
        let store = MemorySurveyStore::in_memory();
        let mut wizard = Wizard::new(EntryPoint::Direct, &store);
        walk_to(&mut wizard, Screen::Climate);
        wizard.advance();

        assert_eq!(wizard.advance(), Advance::Finished);
        assert!(!wizard.retreat());
        assert_eq!(wizard.screen(), Screen::Confirmation);
        assert_eq!(store.load_all().len(), 1);
    }

    #[test]
    fn test_retreat() {
        let store = MemorySurveyStore::in_memory();
        let mut wizard = Wizard::new(EntryPoint::Welcome, &store);
        assert!(!wizard.retreat());

        wizard.advance();
        wizard.advance();
        assert_eq!(wizard.step(), 3);

        // Retreat ignores validation on the current screen.
        assert!(wizard.retreat());
        assert_eq!(wizard.step(), 2);
        assert!(wizard.retreat());
        assert!(!wizard.retreat());
        assert_eq!(wizard.step(), 1);
    }

    #[test]
    fn test_edits_merge_regardless_of_screen() {
        let store = MemorySurveyStore::in_memory();
        let mut wizard = Wizard::new(EntryPoint::Welcome, &store);
        wizard.set_field(FieldId::Answer(Question::Metas), "Certificação");
        assert!(wizard.record().is_answered(FieldId::Answer(Question::Metas)));
        assert_eq!(wizard.step(), 1);
    }

    #[test]
    fn test_reset() {
        let store = MemorySurveyStore::in_memory();
        let mut wizard = Wizard::new(EntryPoint::Welcome, &store);
        walk_to(&mut wizard, Screen::Climate);
        wizard.advance();

        wizard.reset();
        assert_eq!(wizard.step(), 1);
        assert!(wizard.record().is_empty());
    }
}
