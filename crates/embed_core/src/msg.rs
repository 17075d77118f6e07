use crate::effect::TimerKey;
use crate::heuristic::SurfaceProbe;
use crate::popup::{LaunchId, WindowId};
use crate::session::{ProbeCheck, SessionId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Host asked to show a report link in the panel.
    LoadReport(String),
    /// Fallback action: open the link in a secondary window.
    OpenPopup(String),
    /// Fallback action: start a fresh authenticated attempt.
    RetryAuthenticated(String),
    /// Last-resort attempt with all surface restrictions removed.
    ForceLoad(String),
    CopyLink(String),
    /// Load notification from the observer registered for `session`.
    SurfaceLoaded { session: SessionId },
    /// Error notification from the observer registered for `session`, or a
    /// refused navigation.
    SurfaceErrored { session: SessionId },
    SurfaceProbed {
        session: SessionId,
        check: ProbeCheck,
        probe: SurfaceProbe,
    },
    TimerFired(TimerKey),
    PopupOpened { launch: LaunchId, window: WindowId },
    PopupBlocked { launch: LaunchId },
    NewTabOpened { launch: LaunchId },
    NewTabBlocked { launch: LaunchId },
    PopupClosed { launch: LaunchId },
    ClipboardWritten(Result<(), String>),
}
