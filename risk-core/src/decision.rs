//! Score-to-decision mapping

use serde::{Deserialize, Serialize};

/// Policy outcome for an evaluated request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionOutcome {
    /// Low risk, proceed
    Allow,
    /// Medium risk, require a challenge
    Captcha,
    /// High risk, refuse the request
    Block,
    /// Extreme risk, accept silently and discard
    ShadowBan,
}

impl DecisionOutcome {
    /// Wire-format name, also used as a metrics label
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionOutcome::Allow => "ALLOW",
            DecisionOutcome::Captcha => "CAPTCHA",
            DecisionOutcome::Block => "BLOCK",
            DecisionOutcome::ShadowBan => "SHADOW_BAN",
        }
    }
}

/// Static score bands. Each bound is the inclusive maximum of its band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionThresholds {
    /// Scores up to here allow
    pub allow_max: i32,
    /// Scores up to here challenge
    pub captcha_max: i32,
    /// Scores up to here block; anything above shadow-bans
    pub block_max: i32,
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            allow_max: 20,
            captcha_max: 50,
            block_max: 80,
        }
    }
}

/// Map a total score to a policy outcome. Total over the full i32
/// domain; negative scores allow.
pub fn decide(total: i32, thresholds: &DecisionThresholds) -> DecisionOutcome {
    if total <= thresholds.allow_max {
        DecisionOutcome::Allow
    } else if total <= thresholds.captcha_max {
        DecisionOutcome::Captcha
    } else if total <= thresholds.block_max {
        DecisionOutcome::Block
    } else {
        DecisionOutcome::ShadowBan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_band_boundaries_are_exact() {
        let t = DecisionThresholds::default();
        assert_eq!(decide(0, &t), DecisionOutcome::Allow);
        assert_eq!(decide(20, &t), DecisionOutcome::Allow);
        assert_eq!(decide(21, &t), DecisionOutcome::Captcha);
        assert_eq!(decide(50, &t), DecisionOutcome::Captcha);
        assert_eq!(decide(51, &t), DecisionOutcome::Block);
        assert_eq!(decide(80, &t), DecisionOutcome::Block);
        assert_eq!(decide(81, &t), DecisionOutcome::ShadowBan);
    }

    #[test]
    fn test_negative_scores_allow() {
        let t = DecisionThresholds::default();
        assert_eq!(decide(-1, &t), DecisionOutcome::Allow);
        assert_eq!(decide(i32::MIN, &t), DecisionOutcome::Allow);
    }

    proptest! {
        #[test]
        fn prop_mapping_is_total_and_deterministic(total in any::<i32>()) {
            let t = DecisionThresholds::default();
            let expected = if total <= 20 {
                DecisionOutcome::Allow
            } else if total <= 50 {
                DecisionOutcome::Captcha
            } else if total <= 80 {
                DecisionOutcome::Block
            } else {
                DecisionOutcome::ShadowBan
            };
            prop_assert_eq!(decide(total, &t), expected);
            prop_assert_eq!(decide(total, &t), decide(total, &t));
        }

        #[test]
        fn prop_mapping_is_monotonic(a in any::<i32>(), b in any::<i32>()) {
            let t = DecisionThresholds::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            // Severity never decreases as the score grows
            prop_assert!(severity(decide(lo, &t)) <= severity(decide(hi, &t)));
        }
    }

    fn severity(outcome: DecisionOutcome) -> u8 {
        match outcome {
            DecisionOutcome::Allow => 0,
            DecisionOutcome::Captcha => 1,
            DecisionOutcome::Block => 2,
            DecisionOutcome::ShadowBan => 3,
        }
    }
}
