//! Bounded event log
//!
//! A capped, newest-first ring buffer of evaluation records, exposed
//! read-only for auditing and dashboards. Volatile by design.

use crate::decision::DecisionOutcome;
use crate::engine::Evaluation;
use crate::types::{ActionType, RiskResult, SignatureStatus};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

/// One evaluated request plus its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Record id
    pub id: Uuid,
    /// When the evaluation happened
    pub at: DateTime<Utc>,
    /// Client IP from the payload
    pub ip: String,
    /// Raw user-agent
    pub user_agent: String,
    /// Attempted action
    pub action: ActionType,
    /// Device id, when supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    /// Score and explanation trail
    pub risk: RiskResult,
    /// Policy decision
    pub decision: DecisionOutcome,
    /// Signature guard outcome
    pub signature_status: SignatureStatus,
}

impl EventRecord {
    /// Build a record from an engine evaluation, stamped now
    pub fn from_evaluation(evaluation: Evaluation) -> Self {
        Self {
            id: Uuid::new_v4(),
            at: Utc::now(),
            ip: evaluation.context.ip,
            user_agent: evaluation.context.user_agent,
            action: evaluation.context.action,
            device_id: evaluation.context.device_id,
            risk: evaluation.risk,
            decision: evaluation.decision,
            signature_status: evaluation.signature_status,
        }
    }
}

/// Capped ring buffer of evaluation records, newest first
pub struct EventLog {
    capacity: usize,
    events: RwLock<VecDeque<EventRecord>>,
}

impl EventLog {
    /// Create a log holding at most `capacity` records
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            events: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Append a record, evicting the oldest when full
    pub fn record(&self, record: EventRecord) {
        let mut events = self.events.write();
        events.push_front(record);
        events.truncate(self.capacity);
    }

    /// Snapshot of the buffer, newest first
    pub fn snapshot(&self) -> Vec<EventRecord> {
        self.events.read().iter().cloned().collect()
    }

    /// Number of records currently held
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// True when no records are held
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(100)
    }
}
