use crate::effect::{Effect, TimerKey};
use crate::error::EmbedError;
use crate::fallback::{FallbackReason, FallbackView};
use crate::heuristic::SurfaceProbe;
use crate::link::ReportLink;
use crate::popup::{LaunchId, LaunchStage, PopupLaunch, PopupTimer, WindowId, POPUP_BLOCKED_INSTRUCTION};
use crate::session::{Phase, ProbeCheck, SessionId, SessionTimer, Strategy};
use crate::settings::millis;
use crate::{AppState, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::LoadReport(raw) => load_report(&mut state, &raw),
        Msg::RetryAuthenticated(raw) => start_attempt(&mut state, &raw, Strategy::Authenticated),
        Msg::ForceLoad(raw) => start_attempt(&mut state, &raw, Strategy::Forced),
        Msg::OpenPopup(raw) => open_popup(&mut state, &raw),
        Msg::CopyLink(raw) => vec![Effect::WriteClipboard { text: raw }],
        Msg::SurfaceLoaded { session } => surface_loaded(&mut state, session),
        Msg::SurfaceErrored { session } => {
            if state.live_session_mut(session).is_some() {
                state.conclude_failure(EmbedError::EmbedLoadError)
            } else {
                Vec::new()
            }
        }
        Msg::SurfaceProbed {
            session,
            check,
            probe,
        } => surface_probed(&mut state, session, check, &probe),
        Msg::TimerFired(key) => timer_fired(&mut state, key),
        Msg::PopupOpened { launch, window } => popup_opened(&mut state, launch, window),
        Msg::PopupBlocked { launch } => match current_launch(&mut state, launch, LaunchStage::Opening) {
            Some(popup) => {
                popup.stage = LaunchStage::FallingBackToTab;
                let url = popup.link.clone();
                state.mark_dirty();
                vec![Effect::OpenNewTab { launch, url }]
            }
            None => Vec::new(),
        },
        Msg::NewTabOpened { launch } => {
            if let Some(popup) = current_launch(&mut state, launch, LaunchStage::FallingBackToTab) {
                popup.stage = LaunchStage::TabOpened;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NewTabBlocked { launch } => {
            match current_launch(&mut state, launch, LaunchStage::FallingBackToTab) {
                Some(popup) => {
                    popup.stage = LaunchStage::Blocked;
                    state.mark_dirty();
                    vec![Effect::ShowInstruction(POPUP_BLOCKED_INSTRUCTION.to_string())]
                }
                None => Vec::new(),
            }
        }
        Msg::PopupClosed { launch } => popup_closed(&mut state, launch),
        Msg::ClipboardWritten(Ok(())) => {
            state.copy_generation += 1;
            state.panel.copy_acknowledged = true;
            state.mark_dirty();
            vec![Effect::ScheduleTimer {
                key: TimerKey::CopyAck {
                    generation: state.copy_generation,
                },
                after: millis(state.settings().copy_ack_ms),
            }]
        }
        // Clipboard failures are reported by the platform layer only.
        Msg::ClipboardWritten(Err(_)) => Vec::new(),
    };

    (state, effects)
}

fn load_report(state: &mut AppState, raw: &str) -> Vec<Effect> {
    let mut effects = state.supersede_session();
    let link = match ReportLink::parse(raw, &state.settings().domain_marker) {
        Ok(link) => link,
        Err(err) => {
            state.show_fallback(FallbackView::invalid_link(&err));
            return effects;
        }
    };

    let category = link.category();
    match Strategy::for_category(category) {
        Some(strategy) => effects.extend(state.begin_session(link, category, strategy)),
        None => state.show_fallback(FallbackView::for_reason(
            FallbackReason::PublicLinkPolicy,
            link.as_str(),
        )),
    }
    effects
}

/// Retry and force skip classification: the strategy is the caller's choice.
fn start_attempt(state: &mut AppState, raw: &str, strategy: Strategy) -> Vec<Effect> {
    let mut effects = state.supersede_session();
    match ReportLink::parse(raw, &state.settings().domain_marker) {
        Ok(link) => {
            let category = link.category();
            effects.extend(state.begin_session(link, category, strategy));
        }
        Err(err) => state.show_fallback(FallbackView::invalid_link(&err)),
    }
    effects
}

fn surface_loaded(state: &mut AppState, id: SessionId) -> Vec<Effect> {
    let quick = state.settings().quick;
    let authenticated = state.settings().authenticated;
    let Some(session) = state.live_session_mut(id) else {
        return Vec::new();
    };
    if !session.mark_loaded() {
        return Vec::new();
    }
    let (timer, delay_ms) = match session.strategy() {
        Strategy::Quick => (SessionTimer::Settle, quick.settle_ms),
        Strategy::Authenticated => (SessionTimer::FirstCheck, authenticated.first_check_ms),
        Strategy::Forced => return Vec::new(),
    };
    session.advance(Phase::Verifying);
    let key = session.arm(timer);
    vec![Effect::ScheduleTimer {
        key,
        after: millis(delay_ms),
    }]
}

fn surface_probed(
    state: &mut AppState,
    id: SessionId,
    check: ProbeCheck,
    probe: &SurfaceProbe,
) -> Vec<Effect> {
    let second_check_ms = state.settings().authenticated.second_check_ms;
    let positive = match check {
        ProbeCheck::QuickSettle | ProbeCheck::Forced => state.verifiers.quick.looks_loaded(probe),
        ProbeCheck::FirstCheck | ProbeCheck::SecondCheck => {
            state.verifiers.authenticated.looks_loaded(probe)
        }
        ProbeCheck::Poll => state.verifiers.poll.looks_loaded(probe),
    };
    let Some(session) = state.live_session_mut(id) else {
        return Vec::new();
    };

    if positive {
        return state.conclude_success();
    }
    match check {
        ProbeCheck::FirstCheck => {
            let key = session.arm(SessionTimer::SecondCheck);
            vec![Effect::ScheduleTimer {
                key,
                after: millis(second_check_ms),
            }]
        }
        ProbeCheck::QuickSettle | ProbeCheck::SecondCheck | ProbeCheck::Forced => {
            state.conclude_failure(EmbedError::EmbedBlocked)
        }
        ProbeCheck::Poll => Vec::new(),
    }
}

fn timer_fired(state: &mut AppState, key: TimerKey) -> Vec<Effect> {
    match key {
        TimerKey::Session { session, timer } => session_timer(state, session, timer),
        TimerKey::Popup { launch, timer } => popup_timer(state, launch, timer),
        TimerKey::CopyAck { generation } => {
            if generation == state.copy_generation && state.panel.copy_acknowledged {
                state.panel.copy_acknowledged = false;
                state.mark_dirty();
            }
            Vec::new()
        }
        TimerKey::Toast { generation } => {
            if generation == state.toast_generation && state.panel.toast.is_some() {
                state.panel.toast = None;
                state.mark_dirty();
            }
            Vec::new()
        }
    }
}

fn session_timer(state: &mut AppState, id: SessionId, timer: SessionTimer) -> Vec<Effect> {
    let settings = state.settings().clone();
    let Some(session) = state.live_session_mut(id) else {
        return Vec::new();
    };
    // Intervals stay armed between ticks; one-shots are consumed on delivery.
    let armed = if timer == SessionTimer::Poll {
        session.is_armed(timer)
    } else {
        session.disarm(timer)
    };
    if !armed {
        return Vec::new();
    }

    let probe = |check| Effect::ProbeSurface { session: id, check };
    match timer {
        SessionTimer::Timeout => {
            let after_ms = match session.strategy() {
                Strategy::Authenticated => settings.authenticated.timeout_ms,
                Strategy::Quick | Strategy::Forced => settings.quick.timeout_ms,
            };
            state.conclude_failure(EmbedError::EmbedTimeout { after_ms })
        }
        SessionTimer::Settle => vec![probe(ProbeCheck::QuickSettle)],
        SessionTimer::FirstCheck => vec![probe(ProbeCheck::FirstCheck)],
        SessionTimer::SecondCheck => vec![probe(ProbeCheck::SecondCheck)],
        SessionTimer::Poll => {
            let count = session.next_check();
            let mut effects = vec![probe(ProbeCheck::Poll)];
            if count >= settings.authenticated.poll_max_checks {
                session.disarm(SessionTimer::Poll);
                effects.push(Effect::CancelTimer {
                    key: session.key(SessionTimer::Poll),
                });
            }
            effects
        }
        SessionTimer::Reveal => {
            let key = session.arm(SessionTimer::ForcedCheck);
            state.panel.loading = None;
            state.panel.surface_visible = true;
            state.mark_dirty();
            vec![Effect::ScheduleTimer {
                key,
                after: millis(settings.forced.check_ms),
            }]
        }
        SessionTimer::ForcedCheck => vec![probe(ProbeCheck::Forced)],
    }
}

fn open_popup(state: &mut AppState, raw: &str) -> Vec<Effect> {
    let link = match ReportLink::parse(raw, &state.settings().domain_marker) {
        Ok(link) => link,
        Err(err) => {
            // The invalid-link view replaces the panel, so a pending attempt
            // must not reveal its surface over it later.
            let effects = state.supersede_session();
            state.show_fallback(FallbackView::invalid_link(&err));
            return effects;
        }
    };

    let mut effects = supersede_launch(state);
    let launch = state.next_launch_id();
    state.popup = Some(PopupLaunch::new(launch, link.as_str().to_string()));
    state.mark_dirty();
    effects.push(Effect::OpenPopupWindow {
        launch,
        target: state.settings().popup.window_name.clone(),
    });
    effects
}

/// A new launch reuses the named window, so the old launch's pending
/// navigation and polls must not touch it.
fn supersede_launch(state: &mut AppState) -> Vec<Effect> {
    let Some(previous) = state.popup.take() else {
        return Vec::new();
    };
    previous
        .armed
        .iter()
        .map(|timer| Effect::CancelTimer {
            key: TimerKey::Popup {
                launch: previous.id,
                timer: *timer,
            },
        })
        .collect()
}

fn current_launch(
    state: &mut AppState,
    launch: LaunchId,
    stage: LaunchStage,
) -> Option<&mut PopupLaunch> {
    state
        .popup
        .as_mut()
        .filter(|popup| popup.id == launch && popup.stage == stage)
}

fn popup_opened(state: &mut AppState, launch: LaunchId, window: WindowId) -> Vec<Effect> {
    let popup_settings = state.settings().popup.clone();
    let Some(popup) = current_launch(state, launch, LaunchStage::Opening) else {
        return Vec::new();
    };
    popup.stage = LaunchStage::Open(window);
    popup.armed = vec![
        PopupTimer::Navigate,
        PopupTimer::DismissPanel,
        PopupTimer::ClosurePoll,
    ];
    let link = popup.link.clone();
    state.mark_dirty();

    let key = |timer| TimerKey::Popup { launch, timer };
    vec![
        Effect::WriteLoadingDocument { window, link },
        Effect::FocusWindow { window },
        Effect::ScheduleTimer {
            key: key(PopupTimer::Navigate),
            after: millis(popup_settings.navigate_delay_ms),
        },
        Effect::ScheduleTimer {
            key: key(PopupTimer::DismissPanel),
            after: millis(popup_settings.dismiss_delay_ms),
        },
        Effect::ScheduleInterval {
            key: key(PopupTimer::ClosurePoll),
            every: millis(popup_settings.closure_poll_ms),
        },
    ]
}

fn popup_timer(state: &mut AppState, launch: LaunchId, timer: PopupTimer) -> Vec<Effect> {
    let Some(popup) = state.popup.as_mut().filter(|popup| popup.id == launch) else {
        return Vec::new();
    };
    if !popup.armed.contains(&timer) {
        return Vec::new();
    }
    let Some(window) = popup.window() else {
        return Vec::new();
    };
    match timer {
        PopupTimer::Navigate => {
            popup.armed.retain(|armed| *armed != timer);
            vec![Effect::NavigateWindow {
                window,
                url: popup.link.clone(),
            }]
        }
        PopupTimer::DismissPanel => {
            popup.armed.retain(|armed| *armed != timer);
            vec![Effect::DismissPanel]
        }
        PopupTimer::ClosurePoll => vec![Effect::CheckWindowClosed { launch, window }],
    }
}

fn popup_closed(state: &mut AppState, launch: LaunchId) -> Vec<Effect> {
    let Some(popup) = state.popup.as_mut().filter(|popup| popup.id == launch) else {
        return Vec::new();
    };
    if popup.window().is_none() {
        return Vec::new();
    }
    popup.stage = LaunchStage::Closed;
    let cancelled: Vec<Effect> = popup
        .armed
        .drain(..)
        .map(|timer| Effect::CancelTimer {
            key: TimerKey::Popup { launch, timer },
        })
        .collect();
    state.mark_dirty();
    cancelled
}
