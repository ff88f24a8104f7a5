//! Session lifecycle: credential gate, questionnaire progress and the
//! generation phase, for one user at a time.

pub mod controller;
pub mod state;
pub mod store;

pub use controller::{AdvanceOutcome, SessionController, validate_credential};
pub use state::{Phase, SessionState};
pub use store::{InMemorySessionStore, SessionStore};
