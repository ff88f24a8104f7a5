//! Learning preference data models.

use serde::{Deserialize, Serialize};

/// A closed set of options the user picks from.
///
/// `id` is the stable serialized identifier; `label` is what the user sees.
/// Parsing accepts either, case-insensitively.
pub trait ChoiceOption: Copy + Sized + 'static {
    /// Every variant, in display order.
    const ALL: &'static [Self];

    fn id(&self) -> &'static str;

    fn label(&self) -> &'static str;

    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|o| o.label().eq_ignore_ascii_case(raw) || o.id().eq_ignore_ascii_case(raw))
    }

    fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(|o| o.label()).collect()
    }
}

/// Hours per week the user can dedicate to learning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    OneToTwoHours,
    ThreeToFiveHours,
    SixToTenHours,
    MoreThanTenHours,
}

impl ChoiceOption for Availability {
    const ALL: &'static [Self] = &[
        Self::OneToTwoHours,
        Self::ThreeToFiveHours,
        Self::SixToTenHours,
        Self::MoreThanTenHours,
    ];

    fn id(&self) -> &'static str {
        match self {
            Self::OneToTwoHours => "one_to_two_hours",
            Self::ThreeToFiveHours => "three_to_five_hours",
            Self::SixToTenHours => "six_to_ten_hours",
            Self::MoreThanTenHours => "more_than_ten_hours",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::OneToTwoHours => "1-2 hours",
            Self::ThreeToFiveHours => "3-5 hours",
            Self::SixToTenHours => "6-10 hours",
            Self::MoreThanTenHours => "More than 10 hours",
        }
    }
}

/// Preferred way of consuming course material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningFormat {
    Video,
    Interactive,
    Text,
    Project,
    Blended,
}

impl ChoiceOption for LearningFormat {
    const ALL: &'static [Self] = &[
        Self::Video,
        Self::Interactive,
        Self::Text,
        Self::Project,
        Self::Blended,
    ];

    fn id(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Interactive => "interactive",
            Self::Text => "text",
            Self::Project => "project",
            Self::Blended => "blended",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Video => "Video Lectures",
            Self::Interactive => "Interactive Exercises",
            Self::Text => "Text-based Content",
            Self::Project => "Project-based Learning",
            Self::Blended => "Blended Learning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl ChoiceOption for ExperienceLevel {
    const ALL: &'static [Self] = &[
        Self::Beginner,
        Self::Intermediate,
        Self::Advanced,
        Self::Expert,
    ];

    fn id(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
            Self::Expert => "Expert",
        }
    }
}

/// Why the user wants to learn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareerGoal {
    Knowledge,
    Professional,
    Career,
    Academic,
}

impl ChoiceOption for CareerGoal {
    const ALL: &'static [Self] = &[
        Self::Knowledge,
        Self::Professional,
        Self::Career,
        Self::Academic,
    ];

    fn id(&self) -> &'static str {
        match self {
            Self::Knowledge => "knowledge",
            Self::Professional => "professional",
            Self::Career => "career",
            Self::Academic => "academic",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Knowledge => "Knowledge Acquisition",
            Self::Professional => "Professional Development",
            Self::Career => "Career Transition",
            Self::Academic => "Academic Requirement",
        }
    }
}

macro_rules! display_label {
    ($($ty:ty),+) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(self.label())
                }
            }
        )+
    };
}

display_label!(Availability, LearningFormat, ExperienceLevel, CareerGoal);

/// Maximum course budget, in whole dollars.
///
/// Serialized as the tier's integer ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum BudgetTier {
    Free,
    Under50,
    Under100,
    Under200,
    Under500,
    Under1000,
    Over1000,
}

impl BudgetTier {
    pub const ALL: &'static [BudgetTier] = &[
        Self::Free,
        Self::Under50,
        Self::Under100,
        Self::Under200,
        Self::Under500,
        Self::Under1000,
        Self::Over1000,
    ];

    pub fn amount(&self) -> u32 {
        match self {
            Self::Free => 0,
            Self::Under50 => 50,
            Self::Under100 => 100,
            Self::Under200 => 200,
            Self::Under500 => 500,
            Self::Under1000 => 1000,
            Self::Over1000 => 1500,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Free => "Free Courses Only",
            Self::Under50 => "< $50",
            Self::Under100 => "< $100",
            Self::Under200 => "< $200",
            Self::Under500 => "< $500",
            Self::Under1000 => "< $1000",
            Self::Over1000 => "Over $1000",
        }
    }

    pub fn from_amount(amount: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.amount() == amount)
    }

    /// Map a radio-button label back to its tier.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.iter().copied().find(|t| t.label() == label)
    }
}

impl From<BudgetTier> for u32 {
    fn from(tier: BudgetTier) -> Self {
        tier.amount()
    }
}

impl TryFrom<u32> for BudgetTier {
    type Error = String;

    fn try_from(amount: u32) -> Result<Self, Self::Error> {
        Self::from_amount(amount).ok_or_else(|| format!("{amount} is not a budget tier"))
    }
}

impl std::fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}", self.amount())
    }
}

/// A user's complete set of learning preferences.
///
/// Only the questionnaire engine builds these, and only once every answer is
/// present and in-domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceRecord {
    pub name: String,
    pub subject: String,
    pub availability: Availability,
    pub budget: BudgetTier,
    pub format: LearningFormat,
    pub experience: ExperienceLevel,
    pub goal: CareerGoal,
}

impl PreferenceRecord {
    /// Short markdown summary of the preferences shown next to results.
    pub fn summary(&self) -> String {
        format!(
            "**Selected Preferences:**\n- Subject: {}\n- Format: {}\n- Level: {}",
            self.subject, self.format, self.experience
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_label_or_id() {
        assert_eq!(
            LearningFormat::parse("Video Lectures"),
            Some(LearningFormat::Video)
        );
        assert_eq!(
            LearningFormat::parse("project"),
            Some(LearningFormat::Project)
        );
        assert_eq!(
            Availability::parse("  more than 10 HOURS "),
            Some(Availability::MoreThanTenHours)
        );
        assert_eq!(CareerGoal::parse("Career Transition"), Some(CareerGoal::Career));
        assert_eq!(ExperienceLevel::parse("Guru"), None);
    }

    #[test]
    fn serde_uses_ids_display_uses_labels() {
        for format in LearningFormat::ALL {
            let json = serde_json::to_string(format).unwrap();
            assert_eq!(json, format!("\"{}\"", format.id()));
            assert_eq!(format.to_string(), format.label());
        }
        for availability in Availability::ALL {
            let json = serde_json::to_string(availability).unwrap();
            assert_eq!(json, format!("\"{}\"", availability.id()));
        }
    }

    #[test]
    fn budget_tiers_cover_fixed_amounts() {
        let amounts: Vec<u32> = BudgetTier::ALL.iter().map(|t| t.amount()).collect();
        assert_eq!(amounts, vec![0, 50, 100, 200, 500, 1000, 1500]);
        assert_eq!(BudgetTier::from_amount(0), Some(BudgetTier::Free));
        assert_eq!(BudgetTier::from_amount(75), None);
        assert_eq!(BudgetTier::from_label("Over $1000"), Some(BudgetTier::Over1000));
    }

    #[test]
    fn budget_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&BudgetTier::Under200).unwrap(), "200");
        let tier: BudgetTier = serde_json::from_str("0").unwrap();
        assert_eq!(tier, BudgetTier::Free);
        assert!(serde_json::from_str::<BudgetTier>("42").is_err());
    }

    #[test]
    fn summary_uses_labels() {
        let record = PreferenceRecord {
            name: "Ada".into(),
            subject: "Rust".into(),
            availability: Availability::SixToTenHours,
            budget: BudgetTier::Under100,
            format: LearningFormat::Interactive,
            experience: ExperienceLevel::Intermediate,
            goal: CareerGoal::Professional,
        };
        let summary = record.summary();
        assert!(summary.contains("Rust"));
        assert!(summary.contains("Interactive Exercises"));
        assert!(summary.contains("Intermediate"));
    }
}
