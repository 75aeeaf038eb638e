// src/social/mod.rs

pub mod processor;
pub mod types;

pub use processor::{AeiSocialOutcome, SocialConfig, SocialProcessor, SocialRunSummary};
