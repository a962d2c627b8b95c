//! Infrastructure adapters. Implement ports.
//!
//! LLM providers, filesystem, terminal UI. Map errors to DomainError.

pub mod ai;
pub mod persistence;
pub mod ui;
