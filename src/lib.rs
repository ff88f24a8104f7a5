//! Course Compass: guided questionnaire to course recommendations.

pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod questionnaire;
pub mod recommend;
pub mod search;
pub mod session;
