use std::fmt;

use crate::settings::PopupSettings;

pub type LaunchId = u64;

/// Opaque handle the platform assigns to a secondary window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopupTimer {
    Navigate,
    DismissPanel,
    ClosurePoll,
}

pub const POPUP_BLOCKED_INSTRUCTION: &str = "The popup was blocked by the browser. \
Please use the \"New tab\" link or allow popups for this site.";

/// Available screen area as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

impl ScreenRect {
    pub const fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

/// Centers a window on `screen`, capped by the popup settings on each axis.
pub fn centered_geometry(screen: ScreenRect, settings: &PopupSettings) -> WindowGeometry {
    let fraction = settings.screen_fraction.clamp(0.0, 1.0);
    let width = capped_extent(screen.width, fraction, settings.max_width);
    let height = capped_extent(screen.height, fraction, settings.max_height);
    WindowGeometry {
        left: screen.left + ((screen.width - width) / 2) as i32,
        top: screen.top + ((screen.height - height) / 2) as i32,
        width,
        height,
    }
}

fn capped_extent(available: u32, fraction: f64, cap: u32) -> u32 {
    let scaled = (f64::from(available) * fraction).floor() as u32;
    scaled.min(cap).min(available)
}

/// Feature string for the secondary window: sized, resizable, scrollable, no
/// browser chrome.
pub fn window_features(geometry: &WindowGeometry) -> String {
    [
        format!("width={}", geometry.width),
        format!("height={}", geometry.height),
        format!("left={}", geometry.left),
        format!("top={}", geometry.top),
        "scrollbars=yes".to_string(),
        "resizable=yes".to_string(),
        "status=no".to_string(),
        "menubar=no".to_string(),
        "toolbar=no".to_string(),
        "location=no".to_string(),
        "directories=no".to_string(),
    ]
    .join(",")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStage {
    Opening,
    /// Popup refused; a plain new tab was requested instead.
    FallingBackToTab,
    TabOpened,
    Open(WindowId),
    Closed,
    /// Both popup and new tab refused; the user was told to allow popups.
    Blocked,
}

/// Bookkeeping for the most recent popup launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupLaunch {
    pub id: LaunchId,
    pub link: String,
    pub stage: LaunchStage,
    pub(crate) armed: Vec<PopupTimer>,
}

impl PopupLaunch {
    pub(crate) fn new(id: LaunchId, link: String) -> Self {
        Self {
            id,
            link,
            stage: LaunchStage::Opening,
            armed: Vec::new(),
        }
    }

    /// Timers still pending for this launch.
    pub fn armed_timers(&self) -> &[PopupTimer] {
        &self.armed
    }

    pub fn window(&self) -> Option<WindowId> {
        match self.stage {
            LaunchStage::Open(window) => Some(window),
            _ => None,
        }
    }
}
