// Loyalty program design: prompt construction, one model call, reply parsing.
// All model calls go through llm_client; no direct provider calls here.

pub mod generator;
pub mod handlers;
pub mod models;
pub mod parser;
pub mod prompts;
