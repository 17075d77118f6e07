use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::heuristic::Size;

/// Host suffix every report link must carry.
pub const DEFAULT_DOMAIN_MARKER: &str = "powerbi.com";

/// Tunables for the whole orchestrator. Every field has a default, so a
/// settings file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedSettings {
    pub domain_marker: String,
    pub quick: QuickTimings,
    pub authenticated: AuthenticatedTimings,
    pub forced: ForcedTimings,
    pub thresholds: Thresholds,
    pub popup: PopupSettings,
    /// How long the copy button shows its acknowledgment.
    pub copy_ack_ms: u64,
    /// How long the success toast stays on screen.
    pub toast_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickTimings {
    pub timeout_ms: u64,
    pub settle_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthenticatedTimings {
    pub timeout_ms: u64,
    pub first_check_ms: u64,
    pub second_check_ms: u64,
    pub poll_interval_ms: u64,
    pub poll_max_checks: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForcedTimings {
    pub reveal_ms: u64,
    pub check_ms: u64,
}

/// Minimum rendered sizes the verification signals accept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub quick: Size,
    pub authenticated: Size,
    pub poll: Size,
    /// Floor for treating an inspection denial as evidence of rendered content.
    pub access_denied: Size,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupSettings {
    pub max_width: u32,
    pub max_height: u32,
    /// Share of the available screen the popup may cover on each axis.
    pub screen_fraction: f64,
    pub window_name: String,
    pub navigate_delay_ms: u64,
    pub dismiss_delay_ms: u64,
    pub closure_poll_ms: u64,
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self {
            domain_marker: DEFAULT_DOMAIN_MARKER.to_string(),
            quick: QuickTimings::default(),
            authenticated: AuthenticatedTimings::default(),
            forced: ForcedTimings::default(),
            thresholds: Thresholds::default(),
            popup: PopupSettings::default(),
            copy_ack_ms: 2_000,
            toast_ms: 4_000,
        }
    }
}

impl Default for QuickTimings {
    fn default() -> Self {
        Self {
            timeout_ms: 3_000,
            settle_ms: 1_000,
        }
    }
}

impl Default for AuthenticatedTimings {
    fn default() -> Self {
        Self {
            timeout_ms: 20_000,
            first_check_ms: 2_000,
            second_check_ms: 3_000,
            poll_interval_ms: 1_000,
            poll_max_checks: 20,
        }
    }
}

impl Default for ForcedTimings {
    fn default() -> Self {
        Self {
            reveal_ms: 10_000,
            check_ms: 3_000,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            quick: Size::new(100.0, 100.0),
            authenticated: Size::new(400.0, 200.0),
            poll: Size::new(400.0, 250.0),
            access_denied: Size::new(300.0, 150.0),
        }
    }
}

impl Default for PopupSettings {
    fn default() -> Self {
        Self {
            max_width: 1_600,
            max_height: 1_000,
            screen_fraction: 0.85,
            window_name: "ReportWindow".to_string(),
            navigate_delay_ms: 1_500,
            dismiss_delay_ms: 800,
            closure_poll_ms: 1_000,
        }
    }
}

pub(crate) fn millis(ms: u64) -> Duration {
    Duration::from_millis(ms)
}
