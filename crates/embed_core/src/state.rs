use crate::effect::{Effect, Outcome, TimerKey};
use crate::error::EmbedError;
use crate::fallback::{FallbackReason, FallbackView, LoadingNotice, Toast};
use crate::heuristic::Verifiers;
use crate::link::{LinkCategory, ReportLink};
use crate::popup::{LaunchId, PopupLaunch};
use crate::session::{AttemptSession, Phase, SessionId, SessionTimer, Strategy};
use crate::settings::{millis, EmbedSettings};
use crate::surface::SurfaceConfig;
use crate::view_model::{PanelView, SessionSummary};

/// Everything the orchestrator remembers between messages.
#[derive(Debug, Default)]
pub struct AppState {
    settings: EmbedSettings,
    pub(crate) verifiers: Verifiers,
    session: Option<AttemptSession>,
    last_session_id: SessionId,
    pub(crate) panel: Panel,
    pub(crate) popup: Option<PopupLaunch>,
    last_launch_id: LaunchId,
    pub(crate) copy_generation: u64,
    pub(crate) toast_generation: u64,
    dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Panel {
    pub(crate) surface_visible: bool,
    pub(crate) loading: Option<LoadingNotice>,
    pub(crate) fallback: Option<FallbackView>,
    pub(crate) toast: Option<Toast>,
    pub(crate) copy_acknowledged: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: EmbedSettings) -> Self {
        Self {
            verifiers: Verifiers::from_thresholds(&settings.thresholds),
            settings,
            ..Self::default()
        }
    }

    /// Replaces the verification signal sets, e.g. to tune the heuristic.
    pub fn with_verifiers(mut self, verifiers: Verifiers) -> Self {
        self.verifiers = verifiers;
        self
    }

    pub fn settings(&self) -> &EmbedSettings {
        &self.settings
    }

    pub fn session(&self) -> Option<&AttemptSession> {
        self.session.as_ref()
    }

    pub fn popup(&self) -> Option<&PopupLaunch> {
        self.popup.as_ref()
    }

    pub fn view(&self) -> PanelView {
        PanelView {
            surface_visible: self.panel.surface_visible,
            loading: self.panel.loading,
            fallback: self.panel.fallback.clone(),
            toast: self.panel.toast,
            copy_acknowledged: self.panel.copy_acknowledged,
            session: self.session.as_ref().map(|session| SessionSummary {
                id: session.id(),
                category: session.category(),
                strategy: session.strategy(),
                phase: session.phase().clone(),
                check_count: session.check_count(),
            }),
            popup: self.popup.as_ref().map(|launch| launch.stage),
            dirty: self.dirty,
        }
    }

    /// Returns whether the panel changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// The current session, provided it is `id` and still undecided.
    pub(crate) fn live_session_mut(&mut self, id: SessionId) -> Option<&mut AttemptSession> {
        self.session
            .as_mut()
            .filter(|session| session.id() == id && !session.is_concluded())
    }

    pub(crate) fn next_launch_id(&mut self) -> LaunchId {
        self.last_launch_id += 1;
        self.last_launch_id
    }

    /// Tears down the previous session so none of its timers or observers
    /// can act on the panel again.
    pub(crate) fn supersede_session(&mut self) -> Vec<Effect> {
        match self.session.take() {
            Some(mut previous) => previous.release(),
            None => Vec::new(),
        }
    }

    pub(crate) fn show_fallback(&mut self, view: FallbackView) {
        self.panel.loading = None;
        self.panel.surface_visible = false;
        self.panel.fallback = Some(view);
        self.mark_dirty();
    }

    pub(crate) fn begin_session(
        &mut self,
        link: ReportLink,
        category: LinkCategory,
        strategy: Strategy,
    ) -> Vec<Effect> {
        self.last_session_id += 1;
        let mut session = AttemptSession::new(self.last_session_id, link, category, strategy);
        let mut effects = Vec::new();

        session.advance(Phase::Configuring);
        self.panel.fallback = None;
        self.panel.surface_visible = false;
        self.panel.loading = Some(match strategy {
            Strategy::Authenticated => LoadingNotice::Authenticating,
            Strategy::Quick | Strategy::Forced => LoadingNotice::Standard,
        });
        effects.push(Effect::ConfigureSurface(match strategy {
            Strategy::Quick => SurfaceConfig::permissive(),
            Strategy::Authenticated => SurfaceConfig::for_authentication(),
            Strategy::Forced => SurfaceConfig::stripped(),
        }));
        if strategy.observes_surface() {
            effects.push(Effect::ObserveSurface {
                session: session.id(),
            });
        }

        session.advance(Phase::Attempting);
        match strategy {
            Strategy::Quick => {
                let key = session.arm(SessionTimer::Timeout);
                effects.push(Effect::ScheduleTimer {
                    key,
                    after: millis(self.settings.quick.timeout_ms),
                });
            }
            Strategy::Authenticated => {
                let timings = self.settings.authenticated;
                let key = session.arm(SessionTimer::Timeout);
                effects.push(Effect::ScheduleTimer {
                    key,
                    after: millis(timings.timeout_ms),
                });
                let key = session.arm(SessionTimer::Poll);
                effects.push(Effect::ScheduleInterval {
                    key,
                    every: millis(timings.poll_interval_ms),
                });
            }
            Strategy::Forced => {
                let key = session.arm(SessionTimer::Reveal);
                effects.push(Effect::ScheduleTimer {
                    key,
                    after: millis(self.settings.forced.reveal_ms),
                });
            }
        }
        effects.push(Effect::NavigateSurface {
            session: session.id(),
            url: session.link().as_str().to_string(),
        });

        self.session = Some(session);
        self.mark_dirty();
        effects
    }

    pub(crate) fn conclude_success(&mut self) -> Vec<Effect> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        session.advance(Phase::Verifying);
        let Some(mut effects) = session.conclude(Phase::Succeeded) else {
            return Vec::new();
        };
        effects.push(Effect::SessionConcluded {
            session: session.id(),
            outcome: Outcome::Embedded,
        });
        let strategy = session.strategy();

        self.panel.loading = None;
        self.panel.fallback = None;
        self.panel.surface_visible = true;
        if strategy == Strategy::Authenticated {
            self.toast_generation += 1;
            self.panel.toast = Some(Toast::EmbedSucceeded);
            effects.push(Effect::ScheduleTimer {
                key: TimerKey::Toast {
                    generation: self.toast_generation,
                },
                after: millis(self.settings.toast_ms),
            });
        }
        self.mark_dirty();
        effects
    }

    pub(crate) fn conclude_failure(&mut self, err: EmbedError) -> Vec<Effect> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let Some(mut effects) = session.conclude(Phase::Failed(err.clone())) else {
            return Vec::new();
        };
        effects.push(Effect::SessionConcluded {
            session: session.id(),
            outcome: Outcome::Failed(err),
        });
        let view = FallbackView::for_reason(
            FallbackReason::for_strategy(session.strategy()),
            session.link().as_str(),
        );
        self.show_fallback(view);
        effects
    }
}
