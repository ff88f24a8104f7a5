//! Session state machine. Tracks which phase the session is in and the data
//! collected so far.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::questionnaire::{Answer, PreferenceRecord, QuestionKey};
use crate::search::ResourceResult;

/// The phases of a session.
///
/// Collecting → Generating → Done | Error. Reset returns to Collecting from
/// any phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Collecting,
    Generating,
    Done,
    Error,
}

impl Phase {
    /// Check if a forward transition from `self` to `target` is valid.
    ///
    /// Resets are not transitions in this sense and are always allowed.
    pub fn can_transition_to(&self, target: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, target),
            (Collecting, Generating) | (Generating, Done) | (Generating, Error)
        )
    }

    /// Whether this phase waits for an explicit reset.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }

    /// Whether questionnaire input is accepted in this phase.
    pub fn accepts_answers(&self) -> bool {
        matches!(self, Self::Collecting)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Collecting
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Collecting => "collecting",
            Self::Generating => "generating",
            Self::Done => "done",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}

/// Per-session state.
///
/// The credential and its validity flag are never serialized; a restored
/// session must supply its credential again.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    /// Index of the current question; equal to the question count once complete.
    pub step: usize,
    pub answers: BTreeMap<QuestionKey, Answer>,
    pub phase: Phase,
    /// Finalized preferences, set on entering Generating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<PreferenceRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_results: Option<Vec<ResourceResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub credential: Option<SecretString>,
    #[serde(skip)]
    pub credential_valid: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear everything except the credential and its validity flag.
    pub fn reset(&mut self) {
        let credential = self.credential.take();
        let credential_valid = self.credential_valid;
        *self = Self {
            credential,
            credential_valid,
            ..Self::default()
        };
    }

    pub fn has_valid_credential(&self) -> bool {
        self.credential_valid && self.credential.is_some()
    }
}
