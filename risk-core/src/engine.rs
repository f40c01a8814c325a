//! Risk engine orchestration
//!
//! Runs the signature guard first, then the velocity, correlation, and
//! integrity evaluators, and maps the accumulated score to a policy
//! decision. All tracker state is owned here and injected at
//! construction; nothing persists across process restarts.

use crate::correlation::CorrelationTracker;
use crate::decision::{decide, DecisionOutcome, DecisionThresholds};
use crate::error::Result;
use crate::heuristics;
use crate::replay::{ReplayCache, ReplayConfig};
use crate::rules::{RuleCatalog, RuleId};
use crate::signature;
use crate::types::{Reason, RiskContext, RiskResult, SignatureStatus};
use crate::velocity::VelocityTracker;
use serde_json::Value;
use tracing::info;

/// Tracker windows and signal thresholds
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EngineConfig {
    /// IP velocity window
    pub ip_window_ms: i64,
    /// In-window IP count above which the high-velocity rule fires
    pub ip_high_threshold: usize,
    /// In-window IP count above which the extreme rule fires instead
    pub ip_extreme_threshold: usize,

    /// Device velocity window
    pub device_window_ms: i64,
    /// In-window device count above which the device rule fires
    pub device_high_threshold: usize,

    /// Device<->IP correlation lookback
    pub correlation_window_ms: i64,
    /// Unique IPs per device above which the correlation rule fires
    pub device_max_ips: usize,
    /// Unique devices per IP above which the correlation rule fires
    pub ip_max_devices: usize,

    /// Cap on tracked keys per map before idle keys are swept
    pub max_tracked_keys: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ip_window_ms: 10_000,
            ip_high_threshold: 5,
            ip_extreme_threshold: 15,
            device_window_ms: 10_000,
            device_high_threshold: 8,
            correlation_window_ms: 60_000,
            device_max_ips: 3,
            ip_max_devices: 5,
            max_tracked_keys: 50_000,
        }
    }
}

/// A raw checkout/login submission: optional signature fields plus the
/// payload exactly as the client sent it
#[derive(Debug, Clone)]
pub struct Submission {
    /// Session id issued by the session endpoint
    pub session_id: Option<String>,
    /// Challenge issued alongside the session id
    pub challenge: Option<String>,
    /// Client-computed signature over challenge + canonical payload
    pub signature: Option<String>,
    /// The signed payload
    pub payload: Value,
}

/// Outcome of processing one submission
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Context parsed from the payload
    pub context: RiskContext,
    /// Score and explanation trail
    pub risk: RiskResult,
    /// Policy decision derived from the total
    pub decision: DecisionOutcome,
    /// Signature guard outcome, for audit
    pub signature_status: SignatureStatus,
}

/// The evaluation authority. One instance per process.
pub struct RiskEngine {
    config: EngineConfig,
    thresholds: DecisionThresholds,
    catalog: RuleCatalog,
    ip_velocity: VelocityTracker,
    device_velocity: VelocityTracker,
    correlation: CorrelationTracker,
    replay: ReplayCache,
}

impl RiskEngine {
    /// Create an engine with explicit tuning
    pub fn new(
        config: EngineConfig,
        thresholds: DecisionThresholds,
        replay_config: ReplayConfig,
    ) -> Self {
        let ip_velocity = VelocityTracker::new(config.ip_window_ms, config.max_tracked_keys);
        let device_velocity =
            VelocityTracker::new(config.device_window_ms, config.max_tracked_keys);
        let correlation =
            CorrelationTracker::new(config.correlation_window_ms, config.max_tracked_keys);
        Self {
            config,
            thresholds,
            catalog: RuleCatalog::default(),
            ip_velocity,
            device_velocity,
            correlation,
            replay: ReplayCache::new(replay_config),
        }
    }

    /// Full pipeline for one submission: signature guard, then risk
    /// evaluation, then decision mapping. Integrity failures
    /// short-circuit to a single fixed-weight reason.
    pub fn process(&self, submission: &Submission, now_ms: i64) -> Result<Evaluation> {
        let context = RiskContext::from_payload(&submission.payload);

        let signature_status = self.check_signature(submission, now_ms);

        let risk = match signature_status {
            SignatureStatus::Unsigned | SignatureStatus::Tampered => {
                self.fixed_reason(RuleId::SignatureInvalid)?
            }
            SignatureStatus::Replay => self.fixed_reason(RuleId::SignatureReplay)?,
            SignatureStatus::SignedOk => self.evaluate(&context, now_ms)?,
        };

        let decision = decide(risk.total, &self.thresholds);

        info!(
            total = risk.total,
            decision = decision.as_str(),
            signature = signature_status.as_str(),
            ip = %context.ip,
            action = ?context.action,
            "risk evaluated"
        );

        Ok(Evaluation {
            context,
            risk,
            decision,
            signature_status,
        })
    }

    /// Run the stateful trackers and stateless heuristics for a
    /// signature-clean request, accumulating reasons in evaluation
    /// order.
    pub fn evaluate(&self, ctx: &RiskContext, now_ms: i64) -> Result<RiskResult> {
        let mut reasons: Vec<Reason> = Vec::new();

        // 1) IP velocity; extreme and high are mutually exclusive
        let ip_count = self.ip_velocity.record(&ctx.ip, now_ms);
        let window_s = self.config.ip_window_ms / 1000;
        if ip_count > self.config.ip_extreme_threshold {
            self.catalog.add_reason(
                &mut reasons,
                RuleId::IpExtremeVelocity,
                Some(format!("({} in last {}s)", ip_count, window_s)),
            )?;
        } else if ip_count > self.config.ip_high_threshold {
            self.catalog.add_reason(
                &mut reasons,
                RuleId::IpHighVelocity,
                Some(format!("({} in last {}s)", ip_count, window_s)),
            )?;
        }

        // 2) Device velocity and device<->IP correlation, only when a
        //    device id is present
        if let Some(device_id) = &ctx.device_id {
            let device_count = self.device_velocity.record(device_id, now_ms);
            if device_count > self.config.device_high_threshold {
                self.catalog.add_reason(
                    &mut reasons,
                    RuleId::DeviceHighVelocity,
                    Some(format!(
                        "({} in last {}s)",
                        device_count,
                        self.config.device_window_ms / 1000
                    )),
                )?;
            }

            let counts = self.correlation.record(device_id, &ctx.ip, now_ms);
            let corr_s = self.config.correlation_window_ms / 1000;
            if counts.unique_ips_for_device > self.config.device_max_ips {
                self.catalog.add_reason(
                    &mut reasons,
                    RuleId::DeviceManyIps,
                    Some(format!(
                        "({} IPs in last {}s)",
                        counts.unique_ips_for_device, corr_s
                    )),
                )?;
            }
            if counts.unique_devices_for_ip > self.config.ip_max_devices {
                self.catalog.add_reason(
                    &mut reasons,
                    RuleId::IpManyDevices,
                    Some(format!(
                        "({} devices in last {}s)",
                        counts.unique_devices_for_ip, corr_s
                    )),
                )?;
            }
        }

        // 3) Browser integrity and fingerprint checks
        if let Some(browser) = &ctx.browser {
            heuristics::evaluate_browser(&self.catalog, &mut reasons, browser, &ctx.user_agent)?;
        }

        // 4) User-agent shape checks, always
        heuristics::evaluate_user_agent(&self.catalog, &mut reasons, &ctx.user_agent)?;

        // 5) Static denylist
        heuristics::evaluate_ip_denylist(&self.catalog, &mut reasons, &ctx.ip)?;

        Ok(RiskResult::from_reasons(reasons))
    }

    /// Signature guard. Empty strings count as absent, matching the
    /// frontend's truthiness semantics.
    fn check_signature(&self, submission: &Submission, now_ms: i64) -> SignatureStatus {
        let session_id = submission.session_id.as_deref().filter(|s| !s.is_empty());
        let challenge = submission.challenge.as_deref().filter(|s| !s.is_empty());
        let supplied = submission.signature.as_deref().filter(|s| !s.is_empty());

        let (session_id, challenge, supplied) = match (session_id, challenge, supplied) {
            (Some(s), Some(c), Some(g)) => (s, c, g),
            _ => return SignatureStatus::Unsigned,
        };

        if !signature::verify(challenge, &submission.payload, supplied) {
            return SignatureStatus::Tampered;
        }

        if self.replay.check_and_record(session_id, supplied, now_ms) {
            SignatureStatus::Replay
        } else {
            SignatureStatus::SignedOk
        }
    }

    /// Build the single-reason result used when the signature guard
    /// short-circuits. Bypasses the enabled flag: a disabled signature
    /// rule must not silently open the gate.
    fn fixed_reason(&self, id: RuleId) -> Result<RiskResult> {
        let rule = self.catalog.lookup(id)?;
        Ok(RiskResult::from_reasons(vec![Reason {
            rule: rule.id,
            label: rule.label.to_string(),
            points: rule.points,
        }]))
    }

    /// Decision thresholds in force
    pub fn thresholds(&self) -> &DecisionThresholds {
        &self.thresholds
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new(
            EngineConfig::default(),
            DecisionThresholds::default(),
            ReplayConfig::default(),
        )
    }
}
