//! Mailtriage: email triage into a fixed five-line summary record.
//!
//! An email is classified by a model provider when one is configured, and by
//! deterministic keyword heuristics otherwise or when the provider fails.
//! Both paths meet in [`analysis::normalize`], so callers always receive the
//! same [`analysis::AnalysisResult`] shape.
//!
//! See `DESIGN.md` for the architecture and grounding notes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod analysis;
pub mod config;
pub mod credentials;
pub mod logging;
pub mod providers;
pub mod report;
pub mod sink;
pub mod triage;
