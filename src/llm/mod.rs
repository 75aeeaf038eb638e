// src/llm/mod.rs

pub mod client;
pub mod dialog;

pub use client::TextGenClient;
pub use dialog::{DialogGenerator, GeneratedInteraction, InteractionRequest, LlmDialogGenerator};
