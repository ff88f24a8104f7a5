//! The fixed seven-question sequence that collects a user's
//! learning preferences.
//!
//! The engine validates one answer at a time against the current question and
//! only hands out a `PreferenceRecord` once all seven answers are present and
//! in-domain.

pub mod engine;
pub mod model;
pub mod questions;

pub use engine::QuestionnaireEngine;
pub use model::{
    Availability, BudgetTier, CareerGoal, ChoiceOption, ExperienceLevel, LearningFormat,
    PreferenceRecord,
};
pub use questions::{Answer, QuestionKey, QuestionKind, QuestionSpec, QUESTIONS};
