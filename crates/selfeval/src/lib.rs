//! `selfeval` - Employee self-evaluation survey and reporting
//!
//! This library provides the survey wizard, the persistence store for
//! completed submissions and admin comments, and the aggregation engine that
//! turns submissions into per-skill and per-sector reports.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod receipt;
pub mod report;
pub mod seed;
pub mod storage;
pub mod survey;
pub mod wizard;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use report::{AggregateReport, Aggregator, MissingRatings};
pub use storage::{
    AnnotationRepository, MemorySurveyStore, SqliteSurveyStore, SubmissionRepository, SurveyStore,
};
pub use survey::{AnswerRecord, FieldId, Sector, Skill, Submission};
pub use wizard::{Advance, EntryPoint, Wizard};
