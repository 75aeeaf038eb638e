// src/decay/mod.rs

pub mod processor;

pub use processor::{DecayProcessor, DecayRunSummary};
