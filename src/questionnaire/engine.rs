//! Walks the fixed question sequence, validates answers,
//! and finalizes them into a `PreferenceRecord`.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::QuestionnaireError;
use crate::session::SessionState;

use super::model::{
    Availability, BudgetTier, CareerGoal, ChoiceOption, ExperienceLevel, LearningFormat,
    PreferenceRecord,
};
use super::questions::{Answer, QuestionKey, QuestionKind, QuestionSpec, QUESTIONS};

/// Drives the question sequence over a `SessionState`.
///
/// The engine holds no per-session data; the same instance serves any number
/// of sessions.
#[derive(Debug, Clone)]
pub struct QuestionnaireEngine {
    questions: &'static [QuestionSpec],
}

impl Default for QuestionnaireEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionnaireEngine {
    pub fn new() -> Self {
        Self {
            questions: &QUESTIONS,
        }
    }

    pub fn questions(&self) -> &'static [QuestionSpec] {
        self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The question at the state's current step.
    pub fn current_question(
        &self,
        state: &SessionState,
    ) -> Result<&'static QuestionSpec, QuestionnaireError> {
        self.questions
            .get(state.step)
            .ok_or(QuestionnaireError::OutOfRange { step: state.step })
    }

    /// Validate `raw` against the current question, store it, and advance.
    ///
    /// On error the state is not modified.
    pub fn submit_answer(
        &self,
        state: &mut SessionState,
        raw: impl Into<Answer>,
    ) -> Result<(), QuestionnaireError> {
        let question = self.current_question(state)?;
        let answer = normalize(question, raw.into())?;

        debug!(step = state.step, key = %question.key, "Answer accepted");
        state.answers.insert(question.key, answer);
        state.step += 1;
        Ok(())
    }

    pub fn is_complete(&self, state: &SessionState) -> bool {
        state.step >= self.questions.len()
    }

    /// Fraction of the questionnaire completed, for progress bars.
    pub fn progress(&self, state: &SessionState) -> f32 {
        let last = self.questions.len().saturating_sub(1).max(1);
        (state.step as f32 / last as f32).min(1.0)
    }

    /// Label for the submit button at the current step.
    pub fn submit_label(&self, state: &SessionState) -> &'static str {
        if state.step + 1 < self.questions.len() {
            "Next"
        } else {
            "Get Recommendations"
        }
    }

    /// Build a `PreferenceRecord` from the stored answers.
    ///
    /// Any missing key yields `IncompleteAnswers`, listing every missing key.
    pub fn finalize(&self, state: &SessionState) -> Result<PreferenceRecord, QuestionnaireError> {
        let missing: Vec<QuestionKey> = self
            .questions
            .iter()
            .map(|q| q.key)
            .filter(|k| !state.answers.contains_key(k))
            .collect();
        if !missing.is_empty() {
            return Err(QuestionnaireError::IncompleteAnswers { missing });
        }

        let answers = &state.answers;
        Ok(PreferenceRecord {
            name: text_answer(answers, QuestionKey::UserName)?,
            subject: text_answer(answers, QuestionKey::Subject)?,
            availability: choice_answer::<Availability>(answers, QuestionKey::Availability)?,
            budget: budget_answer(answers)?,
            format: choice_answer::<LearningFormat>(answers, QuestionKey::Format)?,
            experience: choice_answer::<ExperienceLevel>(answers, QuestionKey::Experience)?,
            goal: choice_answer::<CareerGoal>(answers, QuestionKey::Goal)?,
        })
    }
}

fn invalid(key: QuestionKey, reason: impl Into<String>) -> QuestionnaireError {
    QuestionnaireError::Validation {
        key,
        reason: reason.into(),
    }
}

/// Check `raw` against the question's domain and return its canonical form:
/// trimmed text, the option label, or the budget tier amount.
fn normalize(question: &QuestionSpec, raw: Answer) -> Result<Answer, QuestionnaireError> {
    let key = question.key;
    match (question.kind, raw) {
        (QuestionKind::FreeText, Answer::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(invalid(key, "an answer is required"));
            }
            Ok(Answer::Text(trimmed.to_string()))
        }
        (QuestionKind::FreeText, Answer::Amount(n)) => Ok(Answer::Text(n.to_string())),
        (QuestionKind::Choice, Answer::Text(text)) => {
            if text.trim().is_empty() {
                return Err(invalid(key, "an answer is required"));
            }
            canonical_label(key, &text).map(Answer::text).ok_or_else(|| {
                invalid(
                    key,
                    format!(
                        "'{}' is not one of: {}",
                        text.trim(),
                        question.options().join(", ")
                    ),
                )
            })
        }
        (QuestionKind::Choice, Answer::Amount(n)) => Err(invalid(
            key,
            format!("{n} is not one of: {}", question.options().join(", ")),
        )),
        // Zero is the free tier, not a missing answer.
        (QuestionKind::Budget, answer) => parse_budget(key, &answer).map(Answer::from),
    }
}

fn canonical_label(key: QuestionKey, raw: &str) -> Option<&'static str> {
    match key {
        QuestionKey::Availability => Availability::parse(raw).map(|o| o.label()),
        QuestionKey::Format => LearningFormat::parse(raw).map(|o| o.label()),
        QuestionKey::Experience => ExperienceLevel::parse(raw).map(|o| o.label()),
        QuestionKey::Goal => CareerGoal::parse(raw).map(|o| o.label()),
        QuestionKey::UserName | QuestionKey::Subject | QuestionKey::Budget => None,
    }
}

fn parse_budget(key: QuestionKey, answer: &Answer) -> Result<BudgetTier, QuestionnaireError> {
    let tier = match answer {
        Answer::Amount(n) => BudgetTier::from_amount(*n),
        Answer::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Err(invalid(key, "an answer is required"));
            }
            text.parse::<u32>()
                .ok()
                .and_then(BudgetTier::from_amount)
                .or_else(|| BudgetTier::from_label(text))
        }
    };
    tier.ok_or_else(|| {
        let allowed: Vec<String> = BudgetTier::ALL.iter().map(|t| t.amount().to_string()).collect();
        invalid(
            key,
            format!("'{answer}' is not a budget tier ({})", allowed.join(", ")),
        )
    })
}

fn text_answer(
    answers: &BTreeMap<QuestionKey, Answer>,
    key: QuestionKey,
) -> Result<String, QuestionnaireError> {
    match answers.get(&key) {
        Some(Answer::Text(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        Some(Answer::Amount(n)) => Ok(n.to_string()),
        Some(Answer::Text(_)) => Err(invalid(key, "an answer is required")),
        None => Err(QuestionnaireError::IncompleteAnswers { missing: vec![key] }),
    }
}

fn choice_answer<T: ChoiceOption>(
    answers: &BTreeMap<QuestionKey, Answer>,
    key: QuestionKey,
) -> Result<T, QuestionnaireError> {
    match answers.get(&key) {
        Some(Answer::Text(text)) => {
            T::parse(text).ok_or_else(|| invalid(key, format!("'{text}' is not a valid option")))
        }
        Some(Answer::Amount(n)) => Err(invalid(key, format!("{n} is not a valid option"))),
        None => Err(QuestionnaireError::IncompleteAnswers { missing: vec![key] }),
    }
}

fn budget_answer(
    answers: &BTreeMap<QuestionKey, Answer>,
) -> Result<BudgetTier, QuestionnaireError> {
    let key = QuestionKey::Budget;
    match answers.get(&key) {
        Some(answer) => parse_budget(key, answer),
        None => Err(QuestionnaireError::IncompleteAnswers { missing: vec![key] }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_answers() -> Vec<Answer> {
        vec![
            Answer::text("Ada"),
            Answer::text("Rust"),
            Answer::text("3-5 hours"),
            Answer::Amount(100),
            Answer::text("Project-based Learning"),
            Answer::text("Beginner"),
            Answer::text("Career Transition"),
        ]
    }

    #[test]
    fn seven_valid_answers_finalize_to_matching_record() {
        let engine = QuestionnaireEngine::new();
        let mut state = SessionState::default();

        for answer in valid_answers() {
            assert!(!engine.is_complete(&state));
            engine.submit_answer(&mut state, answer).unwrap();
        }
        assert!(engine.is_complete(&state));
        assert_eq!(state.step, 7);

        let record = engine.finalize(&state).unwrap();
        assert_eq!(record.name, "Ada");
        assert_eq!(record.subject, "Rust");
        assert_eq!(record.availability, Availability::ThreeToFiveHours);
        assert_eq!(record.budget, BudgetTier::Under100);
        assert_eq!(record.format, LearningFormat::Project);
        assert_eq!(record.experience, ExperienceLevel::Beginner);
        assert_eq!(record.goal, CareerGoal::Career);
    }

    #[test]
    fn zero_budget_is_accepted() {
        let engine = QuestionnaireEngine::new();
        let mut state = SessionState::default();
        state.step = 3;

        engine.submit_answer(&mut state, 0u32).unwrap();
        assert_eq!(state.step, 4);
        assert_eq!(state.answers[&QuestionKey::Budget], Answer::Amount(0));
    }

    #[test]
    fn budget_text_and_label_map_to_tier() {
        let engine = QuestionnaireEngine::new();
        let mut state = SessionState::default();
        state.step = 3;
        engine.submit_answer(&mut state, "0").unwrap();
        assert_eq!(state.answers[&QuestionKey::Budget], Answer::Amount(0));

        state.step = 3;
        engine.submit_answer(&mut state, "< $500").unwrap();
        assert_eq!(state.answers[&QuestionKey::Budget], Answer::Amount(500));
    }

    #[test]
    fn budget_outside_tiers_is_rejected() {
        let engine = QuestionnaireEngine::new();
        let mut state = SessionState::default();
        state.step = 3;

        let err = engine.submit_answer(&mut state, 75u32).unwrap_err();
        assert!(matches!(
            err,
            QuestionnaireError::Validation {
                key: QuestionKey::Budget,
                ..
            }
        ));
        assert_eq!(state.step, 3);
        assert!(state.answers.is_empty());
    }

    #[test]
    fn empty_text_is_rejected_without_advancing() {
        let engine = QuestionnaireEngine::new();
        let mut state = SessionState::default();

        for blank in ["", "   ", "\t\n"] {
            let err = engine.submit_answer(&mut state, blank).unwrap_err();
            assert!(matches!(err, QuestionnaireError::Validation { .. }));
        }
        assert_eq!(state.step, 0);
        assert!(state.answers.is_empty());
    }

    #[test]
    fn unknown_option_is_rejected() {
        let engine = QuestionnaireEngine::new();
        let mut state = SessionState::default();
        state.step = 4;

        let err = engine.submit_answer(&mut state, "Osmosis").unwrap_err();
        match err {
            QuestionnaireError::Validation { key, reason } => {
                assert_eq!(key, QuestionKey::Format);
                assert!(reason.contains("Video Lectures"));
            }
            other => panic!("Expected Validation, got {other:?}"),
        }
        assert_eq!(state.step, 4);
    }

    #[test]
    fn options_are_stored_as_labels() {
        let engine = QuestionnaireEngine::new();
        let mut state = SessionState::default();
        state.step = 5;

        engine.submit_answer(&mut state, "expert").unwrap();
        assert_eq!(
            state.answers[&QuestionKey::Experience],
            Answer::text("Expert")
        );
    }

    #[test]
    fn text_answers_are_trimmed() {
        let engine = QuestionnaireEngine::new();
        let mut state = SessionState::default();
        engine.submit_answer(&mut state, "  Ada  ").unwrap();
        assert_eq!(state.answers[&QuestionKey::UserName], Answer::text("Ada"));
    }

    #[test]
    fn current_question_out_of_range_when_complete() {
        let engine = QuestionnaireEngine::new();
        let mut state = SessionState::default();
        assert_eq!(
            engine.current_question(&state).unwrap().key,
            QuestionKey::UserName
        );

        state.step = 7;
        assert_eq!(
            engine.current_question(&state).unwrap_err(),
            QuestionnaireError::OutOfRange { step: 7 }
        );
        assert!(engine.submit_answer(&mut state, "late").is_err());
    }

    #[test]
    fn finalize_lists_missing_keys() {
        let engine = QuestionnaireEngine::new();
        let mut state = SessionState::default();
        engine.submit_answer(&mut state, "Ada").unwrap();
        engine.submit_answer(&mut state, "Rust").unwrap();
        state.step = 7;

        match engine.finalize(&state).unwrap_err() {
            QuestionnaireError::IncompleteAnswers { missing } => {
                assert_eq!(
                    missing,
                    vec![
                        QuestionKey::Availability,
                        QuestionKey::Budget,
                        QuestionKey::Format,
                        QuestionKey::Experience,
                        QuestionKey::Goal,
                    ]
                );
            }
            other => panic!("Expected IncompleteAnswers, got {other:?}"),
        }
    }

    #[test]
    fn finalize_rejects_tampered_answer() {
        let engine = QuestionnaireEngine::new();
        let mut state = SessionState::default();
        for answer in valid_answers() {
            engine.submit_answer(&mut state, answer).unwrap();
        }
        state
            .answers
            .insert(QuestionKey::Goal, Answer::text("World domination"));

        assert!(matches!(
            engine.finalize(&state),
            Err(QuestionnaireError::Validation {
                key: QuestionKey::Goal,
                ..
            })
        ));
    }

    #[test]
    fn progress_and_submit_label() {
        let engine = QuestionnaireEngine::new();
        let mut state = SessionState::default();
        assert_eq!(engine.progress(&state), 0.0);
        assert_eq!(engine.submit_label(&state), "Next");

        state.step = 3;
        assert!((engine.progress(&state) - 0.5).abs() < f32::EPSILON);

        state.step = 6;
        assert_eq!(engine.progress(&state), 1.0);
        assert_eq!(engine.submit_label(&state), "Get Recommendations");

        state.step = 7;
        assert_eq!(engine.progress(&state), 1.0);
    }
}
