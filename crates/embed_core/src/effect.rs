use std::time::Duration;

use crate::error::EmbedError;
use crate::popup::{LaunchId, PopupTimer, WindowId};
use crate::session::{ProbeCheck, SessionId, SessionTimer};
use crate::surface::SurfaceConfig;

/// Identity of a pending timer. Keys carry the owning session or launch, so a
/// key is never reused across attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    Session {
        session: SessionId,
        timer: SessionTimer,
    },
    Popup {
        launch: LaunchId,
        timer: PopupTimer,
    },
    CopyAck { generation: u64 },
    Toast { generation: u64 },
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Embedded,
    Failed(EmbedError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ConfigureSurface(SurfaceConfig),
    /// Register load/error observers that report for `session` only.
    ObserveSurface { session: SessionId },
    UnobserveSurface { session: SessionId },
    NavigateSurface { session: SessionId, url: String },
    ProbeSurface { session: SessionId, check: ProbeCheck },
    ScheduleTimer { key: TimerKey, after: Duration },
    ScheduleInterval { key: TimerKey, every: Duration },
    CancelTimer { key: TimerKey },
    SessionConcluded { session: SessionId, outcome: Outcome },
    /// Open a blank window under `target` sized by the popup settings.
    OpenPopupWindow { launch: LaunchId, target: String },
    WriteLoadingDocument { window: WindowId, link: String },
    FocusWindow { window: WindowId },
    NavigateWindow { window: WindowId, url: String },
    CheckWindowClosed { launch: LaunchId, window: WindowId },
    OpenNewTab { launch: LaunchId, url: String },
    /// Terminal user-facing instruction; nothing follows it.
    ShowInstruction(String),
    DismissPanel,
    WriteClipboard { text: String },
}
