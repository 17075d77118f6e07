//! Embed core: pure attempt/verify/fallback state machine for showing an
//! external report inside a host panel.
mod effect;
mod error;
mod fallback;
mod heuristic;
mod link;
mod msg;
mod popup;
mod session;
mod settings;
mod state;
mod surface;
mod update;
mod view_model;

pub use effect::{Effect, Outcome, TimerKey};
pub use error::EmbedError;
pub use fallback::{
    FallbackAction, FallbackReason, FallbackView, LoadingNotice, Toast, FALLBACK_MARKER_CLASS,
};
pub use heuristic::{
    DeniedAfterRender, InspectableDocument, Inspection, RenderedSize, Size, SurfaceProbe,
    VerificationSignal, Verifier, Verifiers,
};
pub use link::{classify, LinkCategory, LinkError, ReportLink};
pub use msg::Msg;
pub use popup::{
    centered_geometry, window_features, LaunchId, LaunchStage, PopupLaunch, PopupTimer,
    ScreenRect, WindowGeometry, WindowId, POPUP_BLOCKED_INSTRUCTION,
};
pub use session::{AttemptSession, Phase, ProbeCheck, SessionId, SessionTimer, Strategy};
pub use settings::{
    AuthenticatedTimings, EmbedSettings, ForcedTimings, PopupSettings, QuickTimings, Thresholds,
    DEFAULT_DOMAIN_MARKER,
};
pub use state::AppState;
pub use surface::SurfaceConfig;
pub use update::update;
pub use view_model::{PanelView, SessionSummary};
