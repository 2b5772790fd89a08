#![deny(missing_docs)]
//! # rcve-llm-anthropic — Anthropic provider for the Planner and Validator
//!
//! One concrete [`rcve_llm::Provider`] implementation. Tests in
//! `rcve-planner` and `rcve-validator` use a deterministic in-memory
//! provider instead; this crate is the real collaborator a deployment
//! would wire in.

mod client;
mod error;
mod mapping;

pub use client::Anthropic;
