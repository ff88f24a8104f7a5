//! Prompts for course recommendation.

use crate::questionnaire::PreferenceRecord;

pub const SYSTEM_PROMPT: &str = "You are a helpful course recommendation assistant.";

/// Build the user prompt asking for courses that match `prefs`.
pub fn recommendation_prompt(prefs: &PreferenceRecord) -> String {
    format!(
        "\
As a course recommendation expert, suggest 3-5 specific courses for someone with these preferences:
- Name: {name}
- Subject: {subject}
- Time available: {availability}
- Budget: ${budget}
- Preferred format: {format}
- Experience level: {experience}
- Learning goal: {goal}

For each course, include:
1. Course title and platform
2. Price and duration
3. Key features
4. Why it matches their preferences
5. Link to redirect to the course

Format the response in clear, readable markdown.",
        name = prefs.name,
        subject = prefs.subject,
        availability = prefs.availability,
        budget = prefs.budget.amount(),
        format = prefs.format,
        experience = prefs.experience,
        goal = prefs.goal,
    )
}
