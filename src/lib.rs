//! Loan Match API Library
//!
//! Loan product comparison service: catalog listing with qualifier badges and
//! match scores, plus grounded Q&A about a single product that falls back to
//! deterministic rule-based answers whenever the chat model is unavailable.
//!
//! # Modules
//!
//! - `api`: HTTP-facing components.
//! - `core`: Matching and Q&A logic.
//! - `data`: Catalog sources.
//! - `integrations`: External service integrations.
//! - `assistant`: Model call with rule-based fallback.
//! - `badges`: Product qualifier badges.
//! - `catalog`: Product catalog with store fallback.
//! - `circuit_breaker`: Circuit breaker for store calls.
//! - `config`: Configuration management.
//! - `db`: Database pool management.
//! - `errors`: Error handling types.
//! - `format`: Rupee and rate formatting.
//! - `gemini_client`: Gemini API client.
//! - `handlers`: HTTP request handlers.
//! - `llm`: Chat model abstraction.
//! - `models`: Core data models.
//! - `product_store`: Postgres product store.
//! - `prompt`: Grounding prompt builder.
//! - `responder`: Rule-based responder.
//! - `routes`: Router and OpenAPI document.
//! - `scoring`: Match scoring and ranking.
//! - `seed`: Embedded product dataset.

pub mod api;
pub mod core;
pub mod data;
pub mod integrations;

pub mod assistant;
pub mod badges;
pub mod catalog;
pub mod circuit_breaker;
pub mod config;
pub mod db;
pub mod errors;
pub mod format;
pub mod gemini_client;
pub mod handlers;
pub mod llm;
pub mod models;
pub mod product_store;
pub mod prompt;
pub mod responder;
pub mod routes;
pub mod scoring;
pub mod seed;
