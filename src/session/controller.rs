//! Owns one session's state and applies its phase
//! transitions.

use secrecy::SecretString;
use tracing::{debug, info, warn};

use crate::error::{CredentialError, OrchestratorError, QuestionnaireError, SessionError};
use crate::questionnaire::{Answer, PreferenceRecord, QuestionSpec, QuestionnaireEngine};
use crate::recommend::{Recommendation, RecommendationOrchestrator};

use super::state::{Phase, SessionState};

/// Required prefix for Groq API keys.
pub const CREDENTIAL_PREFIX: &str = "gsk_";

/// Keys must be strictly longer than this many characters.
pub const CREDENTIAL_MIN_EXCLUSIVE_LEN: usize = 20;

/// Shown when finalization finds unanswered questions.
pub const INCOMPLETE_NOTICE: &str = "Please complete all questions before proceeding.";

/// Shown when a session reaches generation without a finalized record.
const MISSING_PREFERENCES_NOTICE: &str =
    "No preferences available. Please start a new search.";

/// Result of feeding one answer to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceOutcome {
    /// The answer was stored; `step` is the next question's index.
    NextQuestion { step: usize },
    /// All answers are in; the session is now generating.
    ReadyToGenerate(PreferenceRecord),
    /// The answers could not be finalized and the session started over.
    Restarted { notice: String },
}

/// Format check for an API key. Never contacts the provider.
pub fn validate_credential(raw: &str) -> Result<(), CredentialError> {
    if raw.starts_with(CREDENTIAL_PREFIX) && raw.chars().count() > CREDENTIAL_MIN_EXCLUSIVE_LEN {
        Ok(())
    } else {
        Err(CredentialError::InvalidFormat {
            prefix: CREDENTIAL_PREFIX,
        })
    }
}

/// Coordinates a single user session: credential, questionnaire, generation.
///
/// Every mutating operation takes `&mut self`, so at most one interaction is
/// in flight per session.
#[derive(Debug, Default)]
pub struct SessionController {
    engine: QuestionnaireEngine,
    state: Option<SessionState>,
}

impl SessionController {
    pub fn new(engine: QuestionnaireEngine) -> Self {
        Self {
            engine,
            state: None,
        }
    }

    pub fn engine(&self) -> &QuestionnaireEngine {
        &self.engine
    }

    /// Create the session state if it does not exist yet.
    ///
    /// Calling this again never discards existing state.
    pub fn initialize(&mut self) -> &SessionState {
        self.state.get_or_insert_with(|| {
            debug!("Session initialized");
            SessionState::default()
        })
    }

    /// Adopt a previously persisted state. Its credential must be set again.
    pub fn restore(&mut self, state: SessionState) {
        debug!(step = state.step, phase = %state.phase, "Session restored");
        self.state = Some(state);
    }

    pub fn state(&self) -> Option<&SessionState> {
        self.state.as_ref()
    }

    pub fn into_state(self) -> Option<SessionState> {
        self.state
    }

    /// The question awaiting an answer.
    pub fn current_question(&self) -> Result<&'static QuestionSpec, QuestionnaireError> {
        match self.state.as_ref() {
            Some(state) => self.engine.current_question(state),
            None => self.engine.current_question(&SessionState::default()),
        }
    }

    /// Validate and store an API key.
    ///
    /// An invalid key clears the validity flag, which blocks the questionnaire
    /// until a valid key is supplied.
    pub fn set_credential(&mut self, raw: &str) -> Result<(), CredentialError> {
        let state = self.state.get_or_insert_with(SessionState::default);
        match validate_credential(raw) {
            Ok(()) => {
                state.credential = Some(SecretString::from(raw.to_string()));
                state.credential_valid = true;
                info!("API key accepted");
                Ok(())
            }
            Err(e) => {
                state.credential_valid = false;
                warn!("Rejected API key with invalid format");
                Err(e)
            }
        }
    }

    pub fn has_valid_credential(&self) -> bool {
        self.state
            .as_ref()
            .is_some_and(SessionState::has_valid_credential)
    }

    /// Submit an answer for the current question.
    ///
    /// Once the last answer is in, the answers are finalized: success moves
    /// the session to `Generating`; failure resets the session and reports a
    /// notice instead of an error.
    pub fn advance(&mut self, raw: impl Into<Answer>) -> Result<AdvanceOutcome, SessionError> {
        let engine = &self.engine;
        let state = self.state.get_or_insert_with(SessionState::default);

        if !state.has_valid_credential() {
            return Err(SessionError::CredentialRequired);
        }
        if !state.phase.accepts_answers() {
            return Err(SessionError::InputDisabled { phase: state.phase });
        }

        if engine.is_complete(state) {
            debug!(step = state.step, "Questionnaire already complete, finalizing");
        } else {
            engine.submit_answer(state, raw)?;
            if !engine.is_complete(state) {
                return Ok(AdvanceOutcome::NextQuestion { step: state.step });
            }
        }

        match engine.finalize(state) {
            Ok(record) => {
                transition(state, Phase::Generating)?;
                state.preferences = Some(record.clone());
                Ok(AdvanceOutcome::ReadyToGenerate(record))
            }
            Err(e) => {
                let notice = match &e {
                    QuestionnaireError::IncompleteAnswers { .. } => INCOMPLETE_NOTICE.to_string(),
                    other => other.to_string(),
                };
                warn!(error = %e, "Answers could not be finalized, restarting session");
                state.reset();
                Ok(AdvanceOutcome::Restarted { notice })
            }
        }
    }

    /// Return to the first question, keeping the credential.
    pub fn reset(&mut self) -> &SessionState {
        let state = self.state.get_or_insert_with(SessionState::default);
        state.reset();
        info!("Session reset");
        state
    }

    /// Store the result of a generation and enter `Done` or `Error`.
    pub fn record_outcome(
        &mut self,
        outcome: Result<Recommendation, OrchestratorError>,
    ) -> Result<&SessionState, SessionError> {
        let state = self.state.get_or_insert_with(SessionState::default);
        match outcome {
            Ok(recommendation) => {
                transition(state, Phase::Done)?;
                state.recommendation_text = Some(recommendation.text);
                state.resource_results = Some(recommendation.resources);
                state.generated_at = Some(recommendation.generated_at);
                state.error_message = None;
            }
            Err(e) => {
                transition(state, Phase::Error)?;
                state.error_message = Some(e.to_string());
            }
        }
        Ok(state)
    }

    /// Run the orchestrator on the finalized preferences and record the result.
    pub async fn generate(
        &mut self,
        orchestrator: &RecommendationOrchestrator,
    ) -> Result<&SessionState, SessionError> {
        let record = {
            let state = self.state.get_or_insert_with(SessionState::default);
            if state.phase != Phase::Generating {
                return Err(SessionError::InvalidTransition {
                    from: state.phase,
                    to: Phase::Done,
                });
            }
            state.preferences.clone()
        };

        let outcome = match record {
            Some(record) => orchestrator.generate(&record).await,
            None => {
                warn!("Generating without finalized preferences");
                Err(OrchestratorError::GenerationFailed {
                    reason: MISSING_PREFERENCES_NOTICE.to_string(),
                })
            }
        };
        self.record_outcome(outcome)
    }
}

fn transition(state: &mut SessionState, to: Phase) -> Result<(), SessionError> {
    if !state.phase.can_transition_to(to) {
        return Err(SessionError::InvalidTransition {
            from: state.phase,
            to,
        });
    }
    info!(from = %state.phase, to = %to, "Session phase changed");
    state.phase = to;
    Ok(())
}
