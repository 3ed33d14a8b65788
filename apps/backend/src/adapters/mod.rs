//! Adapters for external dependencies.

pub mod journal_sea;
