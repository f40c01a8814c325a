//! Risk scoring core for the FraudGate checkout gate
//!
//! Evaluates checkout/login attempts for abuse signals and produces a
//! numeric risk score, an explanation trail, and a policy decision.

#![forbid(unsafe_code)]

pub mod correlation;
pub mod decision;
pub mod engine;
pub mod error;
pub mod events;
pub mod heuristics;
pub mod replay;
pub mod rules;
pub mod signature;
pub mod types;
pub mod velocity;

// Re-exports for convenience
pub use correlation::{CorrelationCounts, CorrelationTracker};
pub use decision::{decide, DecisionOutcome, DecisionThresholds};
pub use engine::{EngineConfig, Evaluation, RiskEngine, Submission};
pub use error::{Error, Result};
pub use events::{EventLog, EventRecord};
pub use replay::{ReplayCache, ReplayConfig};
pub use rules::{Rule, RuleCatalog, RuleCategory, RuleId};
pub use types::*;
pub use velocity::VelocityTracker;
