//! Narrow capability traits the orchestrator needs from its host.
//!
//! A browser host implements these over the DOM; tests implement them with
//! scripted fakes. Nothing else in the engine touches host globals.

use embed_core::{Msg, ScreenRect, SessionId, SurfaceConfig, SurfaceProbe, WindowId};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlatformError {
    #[error("navigation refused: {0}")]
    NavigationRefused(String),
    #[error("clipboard unavailable: {0}")]
    ClipboardUnavailable(String),
}

/// Load/error callback registration owned by one attempt session.
///
/// The host keeps the observer while it is registered and drops it on
/// [`ReportPanel::unobserve_surface`]. Notifications from an observer whose
/// session has been superseded are ignored by the state machine.
#[derive(Debug, Clone)]
pub struct SurfaceObserver {
    session: SessionId,
    tx: UnboundedSender<Msg>,
}

impl SurfaceObserver {
    pub(crate) fn new(session: SessionId, tx: UnboundedSender<Msg>) -> Self {
        Self { session, tx }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn loaded(&self) {
        let _ = self.tx.send(Msg::SurfaceLoaded {
            session: self.session,
        });
    }

    pub fn errored(&self) {
        let _ = self.tx.send(Msg::SurfaceErrored {
            session: self.session,
        });
    }
}

/// The modal panel: embeddable surface, loading indicator and panel body.
pub trait ReportPanel {
    fn configure_surface(&mut self, config: &SurfaceConfig);
    fn observe_surface(&mut self, observer: SurfaceObserver);
    fn unobserve_surface(&mut self, session: SessionId);
    fn navigate_surface(&mut self, url: &str) -> Result<(), PlatformError>;
    /// Bounding box and inspection result of the surface right now.
    fn probe_surface(&self) -> SurfaceProbe;
    fn set_surface_visible(&mut self, visible: bool);
    /// Shows `text` in the loading indicator, or hides it on `None`.
    fn set_loading(&mut self, text: Option<&str>);
    /// Removes the node carrying the fallback marker class, if present.
    fn remove_fallback(&mut self);
    fn insert_fallback(&mut self, markup: &str);
    fn set_toast(&mut self, text: Option<&str>);
    fn set_copy_acknowledged(&mut self, acknowledged: bool);
    /// Hides the modal panel.
    fn dismiss(&mut self);
}

/// Window, screen and clipboard access.
pub trait Platform {
    fn available_screen(&self) -> ScreenRect;
    /// Returns `None` when the browser refuses to open the window.
    fn open_window(&mut self, url: &str, target: &str, features: &str) -> Option<WindowId>;
    fn write_document(&mut self, window: WindowId, html: &str);
    fn navigate_window(&mut self, window: WindowId, url: &str);
    fn focus_window(&mut self, window: WindowId);
    fn is_window_closed(&self, window: WindowId) -> bool;
    fn show_instruction(&mut self, message: &str);
    fn write_clipboard_text(&mut self, text: &str) -> Result<(), PlatformError>;
}
