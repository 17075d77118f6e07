use std::collections::VecDeque;

use embed_core::{
    centered_geometry, update, window_features, AppState, Effect, EmbedError, EmbedSettings, Msg,
    Outcome, PanelView, SessionId,
};
use embed_logging::{embed_debug, embed_error, embed_info, embed_warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::bridge::{BridgeError, HostCommand};
use crate::markup;
use crate::platform::{Platform, ReportPanel, SurfaceObserver};
use crate::render::PanelRenderer;
use crate::timers::TimerService;

/// Cloneable entry point for host code: the named global operations.
#[derive(Debug, Clone)]
pub struct OrchestratorHandle {
    tx: UnboundedSender<Msg>,
}

impl OrchestratorHandle {
    pub fn load_report_smart(&self, link: impl Into<String>) -> bool {
        self.send(Msg::LoadReport(link.into()))
    }

    pub fn open_optimized_popup(&self, link: impl Into<String>) -> bool {
        self.send(Msg::OpenPopup(link.into()))
    }

    pub fn retry_authenticated_embed(&self, link: impl Into<String>) -> bool {
        self.send(Msg::RetryAuthenticated(link.into()))
    }

    pub fn force_iframe_load(&self, link: impl Into<String>) -> bool {
        self.send(Msg::ForceLoad(link.into()))
    }

    pub fn copy_link_to_clipboard(&self, link: impl Into<String>) -> bool {
        self.send(Msg::CopyLink(link.into()))
    }

    pub fn invoke(&self, command: HostCommand) -> bool {
        embed_debug!("host invoked {}", command.operation());
        self.send(command.into_msg())
    }

    /// Entry point for inline handlers that post JSON commands.
    pub fn invoke_json(&self, json: &str) -> Result<bool, BridgeError> {
        Ok(self.invoke(HostCommand::from_json(json)?))
    }

    /// Returns false once the orchestrator is gone.
    fn send(&self, msg: Msg) -> bool {
        self.tx.send(msg).is_ok()
    }
}

/// Owns the state machine and executes its effects against the host.
///
/// Host objects are not required to be `Send`; drive the orchestrator from a
/// current-thread runtime or a `LocalSet`.
pub struct Orchestrator {
    state: AppState,
    panel: Box<dyn ReportPanel>,
    platform: Box<dyn Platform>,
    timers: TimerService,
    renderer: PanelRenderer,
    tx: UnboundedSender<Msg>,
    rx: UnboundedReceiver<Msg>,
    /// Navigation start of the live session, for elapsed-time logging.
    session_clock: Option<(SessionId, Instant)>,
}

impl Orchestrator {
    pub fn new(
        settings: EmbedSettings,
        panel: Box<dyn ReportPanel>,
        platform: Box<dyn Platform>,
    ) -> Self {
        Self::with_state(AppState::with_settings(settings), panel, platform)
    }

    pub fn with_state(
        state: AppState,
        panel: Box<dyn ReportPanel>,
        platform: Box<dyn Platform>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state,
            panel,
            platform,
            timers: TimerService::new(tx.clone()),
            renderer: PanelRenderer::default(),
            tx,
            rx,
            session_clock: None,
        }
    }

    pub fn handle(&self) -> OrchestratorHandle {
        OrchestratorHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn view(&self) -> PanelView {
        self.state.view()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The session whose navigation is currently being timed.
    pub fn timed_session(&self) -> Option<SessionId> {
        self.session_clock.map(|(session, _)| session)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending_count()
    }

    /// Runs one message to completion. Results the host reports
    /// synchronously (window handles, probes) are fed back before returning.
    pub fn dispatch(&mut self, msg: Msg) {
        let mut queue = VecDeque::from([msg]);
        while let Some(msg) = queue.pop_front() {
            if let Msg::TimerFired(key) = &msg {
                self.timers.delivered(*key);
            }
            let state = std::mem::take(&mut self.state);
            let (mut state, effects) = update(state, msg);
            embed_logging::set_active_session(state.session().map(|session| session.id()));
            if state.consume_dirty() {
                self.renderer.apply(self.panel.as_mut(), &state.view());
            }
            self.state = state;
            for effect in effects {
                self.execute(effect, &mut queue);
            }
        }
        embed_logging::set_active_session(None);
    }

    /// Handles every message that is already queued. Returns how many.
    pub fn drain(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.rx.try_recv() {
            self.dispatch(msg);
            handled += 1;
        }
        handled
    }

    pub async fn run(mut self, shutdown: CancellationToken) {
        embed_info!("orchestrator started");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                msg = self.rx.recv() => match msg {
                    Some(msg) => self.dispatch(msg),
                    None => break,
                },
            }
        }
        embed_info!("orchestrator stopped");
    }

    /// Processes messages until `done` holds for the current view.
    pub async fn run_until(&mut self, mut done: impl FnMut(&PanelView) -> bool) {
        while !done(&self.state.view()) {
            match self.rx.recv().await {
                Some(msg) => self.dispatch(msg),
                None => break,
            }
        }
    }

    /// Processes messages for `duration` of (possibly virtual) time.
    pub async fn run_for(&mut self, duration: std::time::Duration) {
        let deadline = tokio::time::sleep(duration);
        tokio::pin!(deadline);
        loop {
            tokio::select! {
                biased;
                msg = self.rx.recv() => match msg {
                    Some(msg) => self.dispatch(msg),
                    None => break,
                },
                _ = &mut deadline => break,
            }
        }
    }

    fn execute(&mut self, effect: Effect, queue: &mut VecDeque<Msg>) {
        match effect {
            Effect::ConfigureSurface(config) => self.panel.configure_surface(&config),
            Effect::ObserveSurface { session } => self
                .panel
                .observe_surface(SurfaceObserver::new(session, self.tx.clone())),
            Effect::UnobserveSurface { session } => self.panel.unobserve_surface(session),
            Effect::NavigateSurface { session, url } => {
                if let Some((previous, started)) =
                    self.session_clock.replace((session, Instant::now()))
                {
                    if previous != session {
                        embed_info!(
                            "session {} superseded after {}ms",
                            previous,
                            started.elapsed().as_millis()
                        );
                    }
                }
                if let Some(current) = self.state.session() {
                    embed_info!(
                        "{:?} link, {:?} attempt: navigating surface to {}",
                        current.category(),
                        current.strategy(),
                        url
                    );
                }
                if let Err(err) = self.panel.navigate_surface(&url) {
                    embed_warn!("{err}");
                    queue.push_back(Msg::SurfaceErrored { session });
                }
            }
            Effect::ProbeSurface { session, check } => {
                let probe = self.panel.probe_surface();
                embed_debug!(
                    "{:?} check: {} {:?}",
                    check,
                    probe.rendered,
                    probe.inspection
                );
                queue.push_back(Msg::SurfaceProbed {
                    session,
                    check,
                    probe,
                });
            }
            Effect::ScheduleTimer { key, after } => self.timers.schedule_once(key, after),
            Effect::ScheduleInterval { key, every } => self.timers.schedule_every(key, every),
            Effect::CancelTimer { key } => {
                if !self.timers.cancel(key) {
                    embed_debug!("timer {:?} already finished", key);
                }
            }
            Effect::SessionConcluded { session, outcome } => {
                let elapsed = match self.session_clock.take() {
                    Some((timed, started)) if timed == session => started.elapsed().as_millis(),
                    other => {
                        self.session_clock = other;
                        0
                    }
                };
                match outcome {
                    Outcome::Embedded => embed_info!("report embedded after {elapsed}ms"),
                    Outcome::Failed(err) => {
                        embed_warn!("attempt failed after {elapsed}ms: {err}")
                    }
                }
            }
            Effect::OpenPopupWindow { launch, target } => {
                let geometry = centered_geometry(
                    self.platform.available_screen(),
                    &self.state.settings().popup,
                );
                let features = window_features(&geometry);
                match self.platform.open_window("", &target, &features) {
                    Some(window) => {
                        embed_info!("popup {} opened as {}", launch, window);
                        queue.push_back(Msg::PopupOpened { launch, window });
                    }
                    None => {
                        embed_warn!("popup {} blocked, trying a new tab", launch);
                        queue.push_back(Msg::PopupBlocked { launch });
                    }
                }
            }
            Effect::WriteLoadingDocument { window, link } => self
                .platform
                .write_document(window, &markup::loading_document(&link)),
            Effect::FocusWindow { window } => self.platform.focus_window(window),
            Effect::NavigateWindow { window, url } => self.platform.navigate_window(window, &url),
            Effect::CheckWindowClosed { launch, window } => {
                if self.platform.is_window_closed(window) {
                    embed_info!("{} closed", window);
                    queue.push_back(Msg::PopupClosed { launch });
                }
            }
            Effect::OpenNewTab { launch, url } => {
                match self.platform.open_window(&url, "_blank", "") {
                    Some(_) => queue.push_back(Msg::NewTabOpened { launch }),
                    None => {
                        embed_error!("{}", EmbedError::PopupBlocked);
                        queue.push_back(Msg::NewTabBlocked { launch });
                    }
                }
            }
            Effect::ShowInstruction(message) => self.platform.show_instruction(&message),
            Effect::DismissPanel => self.panel.dismiss(),
            Effect::WriteClipboard { text } => {
                let result = self
                    .platform
                    .write_clipboard_text(&text)
                    .map_err(|err| err.to_string());
                if let Err(reason) = &result {
                    embed_error!("{}", EmbedError::ClipboardWriteFailed(reason.clone()));
                }
                queue.push_back(Msg::ClipboardWritten(result));
            }
        }
    }
}
