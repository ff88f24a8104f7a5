//! Terminal front end. Walks one session through the questionnaire on
//! stdin/stdout and prints the recommendations.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::config::AppConfig;
use crate::error::{ConfigError, Result};
use crate::llm::create_provider;
use crate::questionnaire::{Answer, BudgetTier, QuestionKind, QuestionSpec};
use crate::recommend::{CourseRecommender, RecommendationOrchestrator, highlighted};
use crate::search::ResourceSearchProvider;
use crate::session::{AdvanceOutcome, Phase, SessionController, SessionState};

const RESET_COMMAND: &str = "/reset";
const QUIT_COMMAND: &str = "/quit";

/// Reads trimmed lines from stdin.
struct Prompter {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompter {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// `None` on EOF.
    async fn ask(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        eprint!("{prompt}");
        Ok(self.lines.next_line().await?.map(|l| l.trim().to_string()))
    }
}

/// Interactive questionnaire session on the terminal.
pub struct TerminalApp {
    config: AppConfig,
    controller: SessionController,
    search: Arc<dyn ResourceSearchProvider>,
    prompter: Prompter,
}

impl TerminalApp {
    pub fn new(config: AppConfig, search: Arc<dyn ResourceSearchProvider>) -> Self {
        Self {
            config,
            controller: SessionController::default(),
            search,
            prompter: Prompter::new(),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        self.controller.initialize();

        let Some(api_key) = self.obtain_credential().await? else {
            return Ok(());
        };

        let llm = create_provider(&self.config.llm_config(api_key))?;
        let recommender = Arc::new(CourseRecommender::new(llm, self.config.recommender_config()));
        let orchestrator = RecommendationOrchestrator::new(
            recommender,
            Arc::clone(&self.search),
            self.config.orchestrator_config(),
        );

        eprintln!(
            "Type {RESET_COMMAND} to start over or {QUIT_COMMAND} to exit at any prompt.\n"
        );

        loop {
            let phase = self.controller.initialize().phase;
            let keep_going = match phase {
                Phase::Collecting => self.collect_answer().await?,
                Phase::Generating => {
                    eprintln!("Generating personalized course recommendations...");
                    self.controller.generate(&orchestrator).await?;
                    true
                }
                Phase::Done | Phase::Error => {
                    println!("{}", render_outcome(self.controller.initialize()));
                    self.offer_restart(phase).await?
                }
            };
            if !keep_going {
                return Ok(());
            }
        }
    }

    /// Use the configured key or prompt until a well-formed one is entered.
    async fn obtain_credential(&mut self) -> Result<Option<SecretString>> {
        if let Some(key) = self.config.api_key.clone() {
            match self.controller.set_credential(key.expose_secret()) {
                Ok(()) => return Ok(Some(key)),
                Err(e) => eprintln!("GROQ_API_KEY: {e}"),
            }
        }

        eprintln!("A Groq API key is required. Get one from https://console.groq.com/keys");
        loop {
            let Some(raw) = self.prompter.ask("Enter your Groq API key: ").await? else {
                return Err(ConfigError::MissingEnvVar("GROQ_API_KEY".to_string()).into());
            };
            if raw == QUIT_COMMAND {
                return Ok(None);
            }
            match self.controller.set_credential(&raw) {
                Ok(()) => return Ok(Some(SecretString::from(raw))),
                Err(e) => eprintln!("{e}"),
            }
        }
    }

    /// Ask the current question once. Returns false to quit.
    async fn collect_answer(&mut self) -> Result<bool> {
        let question = self.controller.current_question()?;
        let prompt = {
            let engine = self.controller.engine();
            let fresh = SessionState::default();
            let state = self.controller.state().unwrap_or(&fresh);
            let header = render_question(question, state.step, engine.len());
            format!("{header}\n[{}] > ", engine.submit_label(state))
        };

        let Some(line) = self.prompter.ask(&prompt).await? else {
            return Ok(false);
        };
        match line.as_str() {
            QUIT_COMMAND => return Ok(false),
            RESET_COMMAND => {
                self.controller.reset();
                return Ok(true);
            }
            _ => {}
        }

        match self.controller.advance(parse_input(question, &line)) {
            Ok(AdvanceOutcome::NextQuestion { .. }) | Ok(AdvanceOutcome::ReadyToGenerate(_)) => {}
            Ok(AdvanceOutcome::Restarted { notice }) => eprintln!("{notice}"),
            Err(e) => eprintln!("{e}"),
        }
        Ok(true)
    }

    /// Returns false to quit.
    async fn offer_restart(&mut self, phase: Phase) -> Result<bool> {
        let prompt = if phase == Phase::Error {
            "Try again? [y/N] "
        } else {
            "Start a new search? [y/N] "
        };
        let answer = self.prompter.ask(prompt).await?;
        match answer.as_deref() {
            Some("y") | Some("Y") | Some("yes") | Some(RESET_COMMAND) => {
                self.controller.reset();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Numbered prompt for a question.
pub fn render_question(question: &QuestionSpec, step: usize, total: usize) -> String {
    let mut out = format!("\n## Step {} of {}\n### {}", step + 1, total, question.prompt);
    for (i, option) in question.options().iter().enumerate() {
        out.push_str(&format!("\n  {}. {}", i + 1, option));
    }
    out
}

/// Map a typed line to an answer. Option numbers select the option; budget
/// options become their tier amount.
pub fn parse_input(question: &QuestionSpec, line: &str) -> Answer {
    let line = line.trim();
    let picked = line
        .parse::<usize>()
        .ok()
        .filter(|n| *n >= 1)
        .map(|n| n - 1);

    match question.kind {
        QuestionKind::FreeText => Answer::text(line),
        QuestionKind::Choice => match picked.and_then(|i| question.options().get(i).copied()) {
            Some(label) => Answer::text(label),
            None => Answer::text(line),
        },
        QuestionKind::Budget => match picked.and_then(|i| BudgetTier::ALL.get(i)) {
            Some(tier) => Answer::from(*tier),
            None => Answer::text(line),
        },
    }
}

/// Result view for a finished session.
pub fn render_outcome(state: &SessionState) -> String {
    if let Some(error) = &state.error_message {
        return format!("\n❌ {error}");
    }
    let Some(text) = &state.recommendation_text else {
        return "\nNo recommendations available. Please start a new search.".to_string();
    };

    let mut out = String::new();
    match &state.preferences {
        Some(prefs) => {
            out.push_str(&format!(
                "\n# Personalized Course Recommendations for {}\n\n",
                prefs.name
            ));
            out.push_str(text);
            out.push_str("\n\n## Quick Summary\n");
            out.push_str(&prefs.summary());
        }
        None => out.push_str(text),
    }

    out.push_str("\n\n## Additional Learning Resources\n");
    let resources = state.resource_results.as_deref().unwrap_or_default();
    if resources.is_empty() {
        out.push_str("No additional resources found.");
    } else {
        for resource in highlighted(resources) {
            out.push_str(&format!(
                "- **{}**: {}\n  {}\n",
                resource.title, resource.body, resource.url
            ));
        }
    }
    out
}
