//! Static rule catalog
//!
//! Every weighted signal the engine can emit is declared here with its
//! category, point weight, and enabled flag. The catalog is immutable
//! after construction; a lookup miss is a build-time contract
//! violation surfaced as [`Error::UnknownRule`].

use crate::error::{Error, Result};
use crate::types::Reason;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Rule identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleId {
    IpHighVelocity,
    IpExtremeVelocity,
    DeviceHighVelocity,
    DeviceManyIps,
    IpManyDevices,
    HeadlessUa,
    NoWebgl,
    SoftwareRenderer,
    MobileZeroTouch,
    MobileDesktopPlatform,
    MobileDesktopResolution,
    DesktopSingleCore,
    DesktopLowMemory,
    NoLanguages,
    NoAudioContext,
    MissingCanvasFp,
    UaTooShort,
    UaMissingMozilla,
    UaMalformedMozilla,
    UaNonBrowser,
    UaMissingEngine,
    UaPythonRequests,
    TestIp,
    SignatureInvalid,
    SignatureReplay,
}

/// Rule category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleCategory {
    Velocity,
    Correlation,
    BrowserIntegrity,
    Fingerprint,
    UserAgent,
    Signature,
    Testing,
}

/// A single catalog entry
#[derive(Debug, Clone, Serialize)]
pub struct Rule {
    /// Unique rule id
    pub id: RuleId,
    /// Base label (dynamic bits are appended in code)
    pub label: &'static str,
    /// Rule category
    pub category: RuleCategory,
    /// Point weight, non-negative
    pub points: i32,
    /// Disabled rules are skipped at evaluation time
    pub enabled: bool,
}

/// Catalog of all registered rules, keyed by id
pub struct RuleCatalog {
    rules: HashMap<RuleId, Rule>,
}

impl RuleCatalog {
    /// Build a catalog from an explicit rule list (used by tests to
    /// model misconfiguration)
    pub fn with_rules(rules: Vec<Rule>) -> Self {
        Self {
            rules: rules.into_iter().map(|r| (r.id, r)).collect(),
        }
    }

    /// Look up a rule by id. Failing here means a caller asked for a
    /// rule the catalog does not carry; the error is fatal by design.
    pub fn lookup(&self, id: RuleId) -> Result<&Rule> {
        self.rules.get(&id).ok_or(Error::UnknownRule(id))
    }

    /// Resolve a rule and append a [`Reason`] carrying its label and
    /// points. No-ops when the rule is disabled. `detail` is appended
    /// to the base label with a separating space.
    pub fn add_reason(
        &self,
        reasons: &mut Vec<Reason>,
        id: RuleId,
        detail: Option<String>,
    ) -> Result<()> {
        let rule = self.lookup(id)?;
        if !rule.enabled {
            return Ok(());
        }
        let label = match detail {
            Some(d) => format!("{} {}", rule.label, d),
            None => rule.label.to_string(),
        };
        reasons.push(Reason {
            rule: rule.id,
            label,
            points: rule.points,
        });
        Ok(())
    }

    /// Number of registered rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the catalog carries no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::with_rules(default_rules())
    }
}

/// The shipped rule set
pub fn default_rules() -> Vec<Rule> {
    use RuleCategory::*;
    use RuleId::*;

    vec![
        Rule {
            id: IpHighVelocity,
            label: "High request velocity from IP",
            category: Velocity,
            points: 30,
            enabled: true,
        },
        Rule {
            id: IpExtremeVelocity,
            label: "Extreme request velocity from IP",
            category: Velocity,
            points: 60,
            enabled: true,
        },
        Rule {
            id: DeviceHighVelocity,
            label: "High request velocity from device",
            category: Velocity,
            points: 25,
            enabled: true,
        },
        Rule {
            id: DeviceManyIps,
            label: "Device used across many IPs",
            category: Correlation,
            points: 35,
            enabled: true,
        },
        Rule {
            id: IpManyDevices,
            label: "IP has seen many devices",
            category: Correlation,
            points: 35,
            enabled: true,
        },
        Rule {
            id: HeadlessUa,
            label: "Headless browser detected in user-agent",
            category: BrowserIntegrity,
            points: 50,
            enabled: true,
        },
        Rule {
            id: NoWebgl,
            label: "No WebGL renderer information",
            category: BrowserIntegrity,
            points: 15,
            enabled: true,
        },
        Rule {
            id: SoftwareRenderer,
            label: "Software WebGL renderer detected",
            category: BrowserIntegrity,
            points: 25,
            enabled: true,
        },
        Rule {
            id: MobileZeroTouch,
            label: "Mobile UA with zero touch support",
            category: BrowserIntegrity,
            points: 20,
            enabled: true,
        },
        Rule {
            id: MobileDesktopPlatform,
            label: "Mobile UA but desktop platform",
            category: BrowserIntegrity,
            points: 15,
            enabled: true,
        },
        Rule {
            id: MobileDesktopResolution,
            label: "Mobile UA with desktop-like resolution",
            category: BrowserIntegrity,
            points: 10,
            enabled: true,
        },
        Rule {
            id: DesktopSingleCore,
            label: "Desktop UA with single CPU core",
            category: BrowserIntegrity,
            points: 10,
            enabled: true,
        },
        Rule {
            id: DesktopLowMemory,
            label: "Very low reported device memory for desktop UA",
            category: BrowserIntegrity,
            points: 10,
            enabled: true,
        },
        Rule {
            id: NoLanguages,
            label: "No browser languages reported",
            category: Fingerprint,
            points: 10,
            enabled: true,
        },
        Rule {
            id: NoAudioContext,
            label: "No AudioContext support",
            category: Fingerprint,
            points: 10,
            enabled: true,
        },
        Rule {
            id: MissingCanvasFp,
            label: "Missing or default canvas fingerprint",
            category: Fingerprint,
            points: 10,
            enabled: true,
        },
        Rule {
            id: UaTooShort,
            label: "Very short user-agent",
            category: UserAgent,
            points: 15,
            enabled: true,
        },
        Rule {
            id: UaMissingMozilla,
            label: "User-agent missing standard \"Mozilla/\" prefix",
            category: UserAgent,
            points: 20,
            enabled: true,
        },
        Rule {
            id: UaMalformedMozilla,
            label: "Malformed Mozilla user-agent",
            category: UserAgent,
            points: 25,
            enabled: true,
        },
        Rule {
            id: UaNonBrowser,
            label: "Known non-browser user-agent pattern",
            category: UserAgent,
            points: 40,
            enabled: true,
        },
        Rule {
            id: UaMissingEngine,
            label: "Missing known browser engine token (Gecko/WebKit/Blink)",
            category: UserAgent,
            points: 20,
            enabled: true,
        },
        Rule {
            id: UaPythonRequests,
            label: "Python / requests user-agent",
            category: UserAgent,
            points: 40,
            enabled: true,
        },
        Rule {
            id: TestIp,
            label: "Known test IP 1.2.3.4.2",
            category: Testing,
            points: 40,
            enabled: true,
        },
        Rule {
            id: SignatureInvalid,
            label: "Invalid or missing telemetry signature",
            category: Signature,
            points: 80,
            enabled: true,
        },
        Rule {
            id: SignatureReplay,
            label: "Replay of signed telemetry (same session/signature)",
            category: Signature,
            points: 70,
            enabled: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_resolves_every_rule() {
        let catalog = RuleCatalog::default();
        assert_eq!(catalog.len(), 25);
        for rule in default_rules() {
            let found = catalog.lookup(rule.id).unwrap();
            assert_eq!(found.points, rule.points);
        }
    }

    #[test]
    fn test_lookup_fails_for_unregistered_rule() {
        let catalog = RuleCatalog::with_rules(Vec::new());
        let err = catalog.lookup(RuleId::TestIp).unwrap_err();
        assert!(matches!(err, Error::UnknownRule(RuleId::TestIp)));
    }

    #[test]
    fn test_add_reason_appends_detail() {
        let catalog = RuleCatalog::default();
        let mut reasons = Vec::new();
        catalog
            .add_reason(
                &mut reasons,
                RuleId::IpHighVelocity,
                Some("(6 in last 10s)".to_string()),
            )
            .unwrap();
        assert_eq!(reasons.len(), 1);
        assert_eq!(reasons[0].label, "High request velocity from IP (6 in last 10s)");
        assert_eq!(reasons[0].points, 30);
    }

    #[test]
    fn test_add_reason_skips_disabled_rule() {
        let mut rules = default_rules();
        for rule in &mut rules {
            if rule.id == RuleId::TestIp {
                rule.enabled = false;
            }
        }
        let catalog = RuleCatalog::with_rules(rules);
        let mut reasons = Vec::new();
        catalog.add_reason(&mut reasons, RuleId::TestIp, None).unwrap();
        assert!(reasons.is_empty());
    }

    #[test]
    fn test_rule_id_wire_names() {
        assert_eq!(
            serde_json::to_value(RuleId::IpExtremeVelocity).unwrap(),
            "IP_EXTREME_VELOCITY"
        );
        assert_eq!(
            serde_json::to_value(RuleId::UaMissingMozilla).unwrap(),
            "UA_MISSING_MOZILLA"
        );
        assert_eq!(serde_json::to_value(RuleId::NoWebgl).unwrap(), "NO_WEBGL");
    }
}
