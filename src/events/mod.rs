//! # Observability Events
//!
//! Each fresh load sample is published as a [`LoadSampled`] event carrying the
//! database identity, the computed load, and the raw session count.

pub mod publisher;
pub mod types;

pub use publisher::HealthEventPublisher;
pub use types::LoadSampled;
