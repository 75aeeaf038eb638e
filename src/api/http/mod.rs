// src/api/http/mod.rs

pub mod decay;
pub mod handlers;
pub mod router;
pub mod social;

pub use router::http_router;
