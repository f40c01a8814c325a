//! Browser integrity and user-agent heuristics
//!
//! Stateless evaluators over a single request. Each check appends zero
//! or more weighted reasons; none of them can fail on malformed input.
//! Absent or contradictory fingerprint fields are risk signals, not
//! errors.

use crate::error::Result;
use crate::rules::{RuleCatalog, RuleId};
use crate::types::{BrowserInfo, Reason};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HEADLESS_UA: Regex =
        Regex::new(r"(?i)HeadlessChrome|PhantomJS|SlimerJS").expect("pattern compiles");
    static ref MOBILE_UA: Regex =
        Regex::new(r"(?i)Mobile|Android|iPhone|iPad").expect("pattern compiles");
    static ref SOFTWARE_RENDERER: Regex =
        Regex::new(r"(?i)swiftshader|llvmpipe|software|mesa").expect("pattern compiles");
    static ref DESKTOP_PLATFORM: Regex = Regex::new(r"(?i)Win|Mac").expect("pattern compiles");
    static ref NON_BROWSER_UA: Regex =
        Regex::new(r"(?i)curl|wget|aiohttp|okhttp|java|node|go-http|httpclient")
            .expect("pattern compiles");
    static ref ENGINE_TOKEN: Regex =
        Regex::new(r"(?i)Gecko|WebKit|Blink").expect("pattern compiles");
    static ref PYTHON_UA: Regex = Regex::new(r"(?i)python|requests").expect("pattern compiles");
    static ref MALFORMED_MOZILLA: Regex =
        Regex::new(r"^Mozilla[^/]").expect("pattern compiles");
}

/// IPs that always flag, used by demo and smoke tests
const DENYLISTED_IPS: &[&str] = &["1.2.3.4.2"];

fn is_absent(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Evaluate the browser fingerprint payload against the user-agent it
/// arrived with. Checks run unconditionally in a fixed order and are
/// not mutually exclusive.
pub fn evaluate_browser(
    catalog: &RuleCatalog,
    reasons: &mut Vec<Reason>,
    browser: &BrowserInfo,
    user_agent: &str,
) -> Result<()> {
    let looks_mobile = MOBILE_UA.is_match(user_agent);

    // Explicit headless indicator in the UA
    if HEADLESS_UA.is_match(user_agent) {
        catalog.add_reason(reasons, RuleId::HeadlessUa, None)?;
    }

    // WebGL renderer integrity
    if is_absent(&browser.webgl_vendor) && is_absent(&browser.webgl_renderer) {
        catalog.add_reason(reasons, RuleId::NoWebgl, None)?;
    } else if let Some(renderer) = browser.webgl_renderer.as_deref() {
        if SOFTWARE_RENDERER.is_match(renderer) {
            catalog.add_reason(
                reasons,
                RuleId::SoftwareRenderer,
                Some(format!("({})", renderer)),
            )?;
        }
    }

    if looks_mobile {
        // Mobile UA with desktop-ish traits
        if browser.max_touch_points.unwrap_or(0) == 0 {
            catalog.add_reason(reasons, RuleId::MobileZeroTouch, None)?;
        }
        if !browser.platform.is_empty() && DESKTOP_PLATFORM.is_match(&browser.platform) {
            catalog.add_reason(
                reasons,
                RuleId::MobileDesktopPlatform,
                Some(format!("({})", browser.platform)),
            )?;
        }
        if browser.screen_width >= 1400 && browser.viewport_width >= 1200 {
            catalog.add_reason(
                reasons,
                RuleId::MobileDesktopResolution,
                Some(format!("({}x{})", browser.screen_width, browser.screen_height)),
            )?;
        }
    } else {
        // Desktop UA sanity checks
        if matches!(browser.hardware_concurrency, Some(cores) if cores <= 1) {
            catalog.add_reason(reasons, RuleId::DesktopSingleCore, None)?;
        }
        if matches!(browser.device_memory, Some(mem) if mem <= 1.0) {
            catalog.add_reason(reasons, RuleId::DesktopLowMemory, None)?;
        }
    }

    // Language list sanity
    if browser.languages.as_ref().map_or(true, |l| l.is_empty()) {
        catalog.add_reason(reasons, RuleId::NoLanguages, None)?;
    }

    // Audio / canvas fingerprinting presence
    if !browser.has_audio_context.unwrap_or(false) {
        catalog.add_reason(reasons, RuleId::NoAudioContext, None)?;
    }

    if browser.canvas_hash.as_deref().map_or(true, |h| h.is_empty() || h == "0") {
        catalog.add_reason(reasons, RuleId::MissingCanvasFp, None)?;
    }

    Ok(())
}

/// Shape checks on the raw user-agent string
pub fn evaluate_user_agent(
    catalog: &RuleCatalog,
    reasons: &mut Vec<Reason>,
    user_agent: &str,
) -> Result<()> {
    let length = user_agent.chars().count();
    if length < 20 {
        catalog.add_reason(
            reasons,
            RuleId::UaTooShort,
            Some(format!("({} chars)", length)),
        )?;
    }

    // "Mozilla/" is the standard prefix across all modern browsers
    if !user_agent.starts_with("Mozilla/") {
        catalog.add_reason(reasons, RuleId::UaMissingMozilla, None)?;
    }

    // "Mozilla" present but malformed, e.g. "Mozilla1"
    if MALFORMED_MOZILLA.is_match(user_agent) {
        catalog.add_reason(
            reasons,
            RuleId::UaMalformedMozilla,
            Some(format!("(\"{}\")", user_agent)),
        )?;
    }

    if NON_BROWSER_UA.is_match(user_agent) {
        catalog.add_reason(
            reasons,
            RuleId::UaNonBrowser,
            Some(format!("(\"{}\")", user_agent)),
        )?;
    }

    if !ENGINE_TOKEN.is_match(user_agent) {
        catalog.add_reason(reasons, RuleId::UaMissingEngine, None)?;
    }

    if PYTHON_UA.is_match(user_agent) {
        catalog.add_reason(reasons, RuleId::UaPythonRequests, None)?;
    }

    Ok(())
}

/// Static denylist check on the raw IP string
pub fn evaluate_ip_denylist(
    catalog: &RuleCatalog,
    reasons: &mut Vec<Reason>,
    ip: &str,
) -> Result<()> {
    if DENYLISTED_IPS.contains(&ip) {
        catalog.add_reason(reasons, RuleId::TestIp, None)?;
    }
    Ok(())
}
