//! examforge-core — Selection & sequencing engine for exam generation.
//!
//! This crate defines the data model, the bank loader, the equivalence
//! resolver, the distribution-constrained sampler, the spacing-aware
//! sequencer, and the variant orchestrator that the examforge system
//! builds on.

pub mod bank;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod resolver;
pub mod rng;
pub mod sampler;
pub mod sequencer;
pub mod statistics;
