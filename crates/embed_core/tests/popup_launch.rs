use std::sync::Once;
use std::time::Duration;

use embed_core::{
    centered_geometry, update, window_features, AppState, Effect, FallbackReason, LaunchStage,
    Msg, PopupSettings, PopupTimer, ScreenRect, TimerKey, WindowId, POPUP_BLOCKED_INSTRUCTION,
};
use pretty_assertions::assert_eq;

const LINK: &str = "https://app.powerbi.com/view?r=abc";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(embed_logging::initialize_for_tests);
}

fn popup_key(launch: u64, timer: PopupTimer) -> TimerKey {
    TimerKey::Popup { launch, timer }
}

#[test]
fn geometry_is_capped_and_centered() {
    let settings = PopupSettings::default();
    for width in (200..=5_000).step_by(37) {
        for height in (200..=3_000).step_by(53) {
            let screen = ScreenRect::new(-40, 25, width, height);
            let geometry = centered_geometry(screen, &settings);

            assert!(geometry.width <= 1_600);
            assert!(geometry.height <= 1_000);
            assert!(geometry.width <= width && geometry.height <= height);

            let left_gap = i64::from(geometry.left) - i64::from(screen.left);
            let right_gap = i64::from(screen.left) + i64::from(width)
                - (i64::from(geometry.left) + i64::from(geometry.width));
            assert!(left_gap >= 0 && right_gap >= 0);
            assert!((left_gap - right_gap).abs() <= 1, "{width}x{height}");

            let top_gap = i64::from(geometry.top) - i64::from(screen.top);
            let bottom_gap = i64::from(screen.top) + i64::from(height)
                - (i64::from(geometry.top) + i64::from(geometry.height));
            assert!(top_gap >= 0 && bottom_gap >= 0);
            assert!((top_gap - bottom_gap).abs() <= 1, "{width}x{height}");
        }
    }
}

#[test]
fn geometry_uses_screen_fraction_below_caps() {
    let geometry = centered_geometry(ScreenRect::new(0, 0, 1_000, 800), &PopupSettings::default());
    assert_eq!(geometry.width, 850);
    assert_eq!(geometry.height, 680);
    assert_eq!(geometry.left, 75);
    assert_eq!(geometry.top, 60);
}

#[test]
fn features_suppress_browser_chrome() {
    let geometry = centered_geometry(ScreenRect::new(0, 0, 2_560, 1_440), &PopupSettings::default());
    assert_eq!(
        window_features(&geometry),
        "width=1600,height=1000,left=480,top=220,scrollbars=yes,resizable=yes,status=no,\
         menubar=no,toolbar=no,location=no,directories=no"
    );
}

#[test]
fn opened_popup_loads_navigates_and_dismisses_panel() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::OpenPopup(LINK.to_string()));
    assert_eq!(
        effects,
        vec![Effect::OpenPopupWindow {
            launch: 1,
            target: "ReportWindow".to_string(),
        }]
    );
    assert_eq!(state.view().popup, Some(LaunchStage::Opening));

    let window = WindowId(7);
    let (state, effects) = update(state, Msg::PopupOpened { launch: 1, window });
    assert_eq!(
        effects,
        vec![
            Effect::WriteLoadingDocument {
                window,
                link: LINK.to_string(),
            },
            Effect::FocusWindow { window },
            Effect::ScheduleTimer {
                key: popup_key(1, PopupTimer::Navigate),
                after: Duration::from_millis(1_500),
            },
            Effect::ScheduleTimer {
                key: popup_key(1, PopupTimer::DismissPanel),
                after: Duration::from_millis(800),
            },
            Effect::ScheduleInterval {
                key: popup_key(1, PopupTimer::ClosurePoll),
                every: Duration::from_millis(1_000),
            },
        ]
    );

    let (state, effects) = update(
        state,
        Msg::TimerFired(popup_key(1, PopupTimer::DismissPanel)),
    );
    assert_eq!(effects, vec![Effect::DismissPanel]);
    let (state, effects) = update(state, Msg::TimerFired(popup_key(1, PopupTimer::Navigate)));
    assert_eq!(
        effects,
        vec![Effect::NavigateWindow {
            window,
            url: LINK.to_string(),
        }]
    );
    let (state, effects) = update(state, Msg::TimerFired(popup_key(1, PopupTimer::Navigate)));
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::TimerFired(popup_key(1, PopupTimer::ClosurePoll)),
    );
    assert_eq!(
        effects,
        vec![Effect::CheckWindowClosed { launch: 1, window }]
    );

    let (state, effects) = update(state, Msg::PopupClosed { launch: 1 });
    assert_eq!(
        effects,
        vec![Effect::CancelTimer {
            key: popup_key(1, PopupTimer::ClosurePoll)
        }]
    );
    assert_eq!(state.view().popup, Some(LaunchStage::Closed));
    let (_, effects) = update(
        state,
        Msg::TimerFired(popup_key(1, PopupTimer::ClosurePoll)),
    );
    assert!(effects.is_empty());
}

#[test]
fn blocked_popup_falls_back_to_new_tab() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::OpenPopup(LINK.to_string()));
    let (state, effects) = update(state, Msg::PopupBlocked { launch: 1 });
    assert_eq!(
        effects,
        vec![Effect::OpenNewTab {
            launch: 1,
            url: LINK.to_string(),
        }]
    );

    let (state, effects) = update(state, Msg::NewTabOpened { launch: 1 });
    assert!(effects.is_empty());
    assert_eq!(state.view().popup, Some(LaunchStage::TabOpened));
}

#[test]
fn blocked_popup_and_tab_end_with_instruction() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::OpenPopup(LINK.to_string()));
    let (state, _) = update(state, Msg::PopupBlocked { launch: 1 });
    let (state, effects) = update(state, Msg::NewTabBlocked { launch: 1 });
    assert_eq!(
        effects,
        vec![Effect::ShowInstruction(POPUP_BLOCKED_INSTRUCTION.to_string())]
    );
    assert_eq!(state.view().popup, Some(LaunchStage::Blocked));

    // Terminal: repeated notifications escalate nothing further.
    let (state, effects) = update(state, Msg::NewTabBlocked { launch: 1 });
    assert!(effects.is_empty());
    let (_, effects) = update(state, Msg::PopupBlocked { launch: 1 });
    assert!(effects.is_empty());
}

#[test]
fn new_launch_cancels_previous_launch_timers() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::OpenPopup(LINK.to_string()));
    let (state, _) = update(
        state,
        Msg::PopupOpened {
            launch: 1,
            window: WindowId(1),
        },
    );
    let (state, effects) = update(state, Msg::OpenPopup(LINK.to_string()));
    assert_eq!(
        effects,
        vec![
            Effect::CancelTimer {
                key: popup_key(1, PopupTimer::Navigate)
            },
            Effect::CancelTimer {
                key: popup_key(1, PopupTimer::DismissPanel)
            },
            Effect::CancelTimer {
                key: popup_key(1, PopupTimer::ClosurePoll)
            },
            Effect::OpenPopupWindow {
                launch: 2,
                target: "ReportWindow".to_string(),
            },
        ]
    );
    let (_, effects) = update(state, Msg::TimerFired(popup_key(1, PopupTimer::Navigate)));
    assert!(effects.is_empty());
}

#[test]
fn popup_refuses_foreign_links() {
    init_logging();
    let (state, effects) = update(
        AppState::new(),
        Msg::OpenPopup("https://example.com/phish".to_string()),
    );
    assert!(effects.is_empty());
    assert_eq!(
        state.view().fallback.unwrap().reason,
        FallbackReason::InvalidLink
    );
}

#[test]
fn closing_before_navigation_cancels_remaining_timers() {
    init_logging();
    let window = WindowId(3);
    let (state, _) = update(AppState::new(), Msg::OpenPopup(LINK.to_string()));
    let (state, _) = update(state, Msg::PopupOpened { launch: 1, window });
    let (state, _) = update(
        state,
        Msg::TimerFired(popup_key(1, PopupTimer::DismissPanel)),
    );

    let (state, effects) = update(state, Msg::PopupClosed { launch: 1 });
    assert_eq!(
        effects,
        vec![
            Effect::CancelTimer {
                key: popup_key(1, PopupTimer::Navigate)
            },
            Effect::CancelTimer {
                key: popup_key(1, PopupTimer::ClosurePoll)
            },
        ]
    );
    assert!(state.popup().unwrap().armed_timers().is_empty());

    // A navigate that raced the cancellation does nothing.
    let (_, effects) = update(state, Msg::TimerFired(popup_key(1, PopupTimer::Navigate)));
    assert!(effects.is_empty());
}
