//! The fixed question sequence and raw answer values.

use serde::{Deserialize, Serialize};

use super::model::{
    Availability, BudgetTier, CareerGoal, ChoiceOption, ExperienceLevel, LearningFormat,
};

/// Storage key for each question's answer.
///
/// Declaration order is question order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKey {
    UserName,
    Subject,
    Availability,
    Budget,
    Format,
    Experience,
    Goal,
}

impl QuestionKey {
    pub const ALL: [QuestionKey; 7] = [
        Self::UserName,
        Self::Subject,
        Self::Availability,
        Self::Budget,
        Self::Format,
        Self::Experience,
        Self::Goal,
    ];
}

impl std::fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::UserName => "user_name",
            Self::Subject => "subject",
            Self::Availability => "availability",
            Self::Budget => "budget",
            Self::Format => "format",
            Self::Experience => "experience",
            Self::Goal => "goal",
        };
        write!(f, "{s}")
    }
}

/// How a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    /// Any non-blank text.
    FreeText,
    /// One of a closed set of labels.
    Choice,
    /// One of the budget tier amounts.
    Budget,
}

/// A single question in the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionSpec {
    pub key: QuestionKey,
    pub prompt: &'static str,
    pub kind: QuestionKind,
}

impl QuestionSpec {
    /// Allowed option labels, empty for free-text questions.
    pub fn options(&self) -> Vec<&'static str> {
        match self.key {
            QuestionKey::Availability => Availability::labels(),
            QuestionKey::Format => LearningFormat::labels(),
            QuestionKey::Experience => ExperienceLevel::labels(),
            QuestionKey::Goal => CareerGoal::labels(),
            QuestionKey::Budget => BudgetTier::ALL.iter().map(|t| t.label()).collect(),
            QuestionKey::UserName | QuestionKey::Subject => Vec::new(),
        }
    }
}

/// The seven questions, in the order they are asked.
pub const QUESTIONS: [QuestionSpec; 7] = [
    QuestionSpec {
        key: QuestionKey::UserName,
        prompt: "Please enter your name:",
        kind: QuestionKind::FreeText,
    },
    QuestionSpec {
        key: QuestionKey::Subject,
        prompt: "What subject or skill would you like to learn?",
        kind: QuestionKind::FreeText,
    },
    QuestionSpec {
        key: QuestionKey::Availability,
        prompt: "How many hours per week can you dedicate to learning?",
        kind: QuestionKind::Choice,
    },
    QuestionSpec {
        key: QuestionKey::Budget,
        prompt: "What is your maximum budget for this course?",
        kind: QuestionKind::Budget,
    },
    QuestionSpec {
        key: QuestionKey::Format,
        prompt: "What is your preferred learning format?",
        kind: QuestionKind::Choice,
    },
    QuestionSpec {
        key: QuestionKey::Experience,
        prompt: "What is your current experience level?",
        kind: QuestionKind::Choice,
    },
    QuestionSpec {
        key: QuestionKey::Goal,
        prompt: "What is your primary goal?",
        kind: QuestionKind::Choice,
    },
];

/// A raw answer as submitted by the UI layer.
///
/// Budget answers arrive as `Amount`; everything else as `Text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Amount(u32),
    Text(String),
}

impl Answer {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u32> for Answer {
    fn from(value: u32) -> Self {
        Self::Amount(value)
    }
}

impl From<BudgetTier> for Answer {
    fn from(tier: BudgetTier) -> Self {
        Self::Amount(tier.amount())
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Amount(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}
