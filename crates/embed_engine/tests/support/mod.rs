//! Scripted host used by the orchestrator tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use embed_core::{
    EmbedSettings, Inspection, ScreenRect, SessionId, Size, SurfaceConfig, SurfaceProbe,
    WindowId,
};
use embed_engine::{Orchestrator, Platform, PlatformError, ReportPanel, SurfaceObserver};
use tokio::time::Instant;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(embed_logging::initialize_for_tests);
}

pub const PUBLIC_LINK: &str = "https://app.powerbi.com/view?r=eyJrIjoiYWJjIn0";
pub const EMBED_LINK: &str = "https://app.powerbi.com/reportEmbed?reportId=42";
pub const AUTH_LINK: &str = "https://app.powerbi.com/reportEmbed?reportId=42&autoAuth=true";

pub struct Harness {
    pub orchestrator: Orchestrator,
    pub panel: Rc<RefCell<PanelRecord>>,
    pub platform: Rc<RefCell<PlatformRecord>>,
}

pub fn harness(settings: EmbedSettings, script: SurfaceScript) -> Harness {
    init_logging();
    let (panel, panel_record) = FakePanel::new(script);
    let (platform, platform_record) = FakePlatform::new();
    Harness {
        orchestrator: Orchestrator::new(settings, Box::new(panel), Box::new(platform)),
        panel: panel_record,
        platform: platform_record,
    }
}

/// How the fake surface behaves after each navigation.
#[derive(Debug, Clone, Default)]
pub struct SurfaceScript {
    pub load_after: Option<Duration>,
    pub error_after: Option<Duration>,
    pub refuse_navigation: bool,
    /// Probe results keyed by time since navigation; the latest entry whose
    /// offset has passed wins.
    pub probes: Vec<(Duration, SurfaceProbe)>,
}

impl SurfaceScript {
    pub fn never_loads() -> Self {
        Self::default()
    }

    pub fn loads_with(after: Duration, probe: SurfaceProbe) -> Self {
        Self {
            load_after: Some(after),
            probes: vec![(Duration::ZERO, probe)],
            ..Self::default()
        }
    }
}

pub fn rendered(width: f64, height: f64, inspection: Inspection) -> SurfaceProbe {
    SurfaceProbe::new(Size::new(width, height), inspection)
}

#[derive(Debug, Default)]
pub struct PanelRecord {
    pub script: SurfaceScript,
    pub configs: Vec<SurfaceConfig>,
    pub navigations: Vec<(Instant, String)>,
    pub observed: Vec<SessionId>,
    pub unobserved: Vec<SessionId>,
    pub probes: usize,
    pub surface_visible: bool,
    pub loading: Option<String>,
    pub fallback_nodes: Vec<String>,
    pub max_fallback_nodes: usize,
    pub fallback_inserts: Vec<Instant>,
    pub toast: Option<String>,
    pub copy_acknowledged: bool,
    pub dismissed: Vec<Instant>,
}

impl PanelRecord {
    pub fn fallback(&self) -> Option<&str> {
        self.fallback_nodes.last().map(String::as_str)
    }
}

type Observers = Arc<Mutex<HashMap<SessionId, SurfaceObserver>>>;

pub struct FakePanel {
    record: Rc<RefCell<PanelRecord>>,
    observers: Observers,
    latest_observed: Option<SessionId>,
}

impl FakePanel {
    pub fn new(script: SurfaceScript) -> (Self, Rc<RefCell<PanelRecord>>) {
        let record = Rc::new(RefCell::new(PanelRecord {
            script,
            ..PanelRecord::default()
        }));
        (
            Self {
                record: Rc::clone(&record),
                observers: Arc::default(),
                latest_observed: None,
            },
            record,
        )
    }

    fn notify_later(&self, after: Duration, loaded: bool) {
        let Some(session) = self.latest_observed else {
            return;
        };
        let observers = Arc::clone(&self.observers);
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let observer = observers.lock().unwrap().get(&session).cloned();
            if let Some(observer) = observer {
                if loaded {
                    observer.loaded();
                } else {
                    observer.errored();
                }
            }
        });
    }
}

impl ReportPanel for FakePanel {
    fn configure_surface(&mut self, config: &SurfaceConfig) {
        self.record.borrow_mut().configs.push(config.clone());
    }

    fn observe_surface(&mut self, observer: SurfaceObserver) {
        let session = observer.session();
        self.latest_observed = Some(session);
        self.record.borrow_mut().observed.push(session);
        self.observers.lock().unwrap().insert(session, observer);
    }

    fn unobserve_surface(&mut self, session: SessionId) {
        self.record.borrow_mut().unobserved.push(session);
        self.observers.lock().unwrap().remove(&session);
    }

    fn navigate_surface(&mut self, url: &str) -> Result<(), PlatformError> {
        let script = {
            let mut record = self.record.borrow_mut();
            record.navigations.push((Instant::now(), url.to_string()));
            record.script.clone()
        };
        if script.refuse_navigation {
            return Err(PlatformError::NavigationRefused(url.to_string()));
        }
        if let Some(after) = script.load_after {
            self.notify_later(after, true);
        }
        if let Some(after) = script.error_after {
            self.notify_later(after, false);
        }
        Ok(())
    }

    fn probe_surface(&self) -> SurfaceProbe {
        let mut record = self.record.borrow_mut();
        record.probes += 1;
        let since = record
            .navigations
            .last()
            .map(|(at, _)| at.elapsed())
            .unwrap_or_default();
        record
            .script
            .probes
            .iter()
            .filter(|(offset, _)| *offset <= since)
            .last()
            .map(|(_, probe)| *probe)
            .unwrap_or_else(|| rendered(0.0, 0.0, Inspection::Empty))
    }

    fn set_surface_visible(&mut self, visible: bool) {
        self.record.borrow_mut().surface_visible = visible;
    }

    fn set_loading(&mut self, text: Option<&str>) {
        self.record.borrow_mut().loading = text.map(str::to_string);
    }

    fn remove_fallback(&mut self) {
        self.record.borrow_mut().fallback_nodes.clear();
    }

    fn insert_fallback(&mut self, markup: &str) {
        let mut record = self.record.borrow_mut();
        record.fallback_nodes.push(markup.to_string());
        record.fallback_inserts.push(Instant::now());
        let nodes = record.fallback_nodes.len();
        if nodes > record.max_fallback_nodes {
            record.max_fallback_nodes = nodes;
        }
    }

    fn set_toast(&mut self, text: Option<&str>) {
        self.record.borrow_mut().toast = text.map(str::to_string);
    }

    fn set_copy_acknowledged(&mut self, acknowledged: bool) {
        self.record.borrow_mut().copy_acknowledged = acknowledged;
    }

    fn dismiss(&mut self) {
        self.record.borrow_mut().dismissed.push(Instant::now());
    }
}

#[derive(Debug)]
pub struct PlatformRecord {
    pub screen: ScreenRect,
    pub allow_popups: bool,
    pub allow_tabs: bool,
    pub clipboard_ok: bool,
    pub opened: Vec<(String, String, String)>,
    pub documents: Vec<(WindowId, String)>,
    pub window_navigations: Vec<(Instant, WindowId, String)>,
    pub focused: Vec<WindowId>,
    pub closed: HashSet<WindowId>,
    pub instructions: Vec<String>,
    pub clipboard: Vec<String>,
    next_window: u64,
}

impl Default for PlatformRecord {
    fn default() -> Self {
        Self {
            screen: ScreenRect::new(0, 0, 2_560, 1_440),
            allow_popups: true,
            allow_tabs: true,
            clipboard_ok: true,
            opened: Vec::new(),
            documents: Vec::new(),
            window_navigations: Vec::new(),
            focused: Vec::new(),
            closed: HashSet::new(),
            instructions: Vec::new(),
            clipboard: Vec::new(),
            next_window: 0,
        }
    }
}

pub struct FakePlatform {
    record: Rc<RefCell<PlatformRecord>>,
}

impl FakePlatform {
    pub fn new() -> (Self, Rc<RefCell<PlatformRecord>>) {
        let record = Rc::new(RefCell::new(PlatformRecord::default()));
        (
            Self {
                record: Rc::clone(&record),
            },
            record,
        )
    }
}

impl Platform for FakePlatform {
    fn available_screen(&self) -> ScreenRect {
        self.record.borrow().screen
    }

    fn open_window(&mut self, url: &str, target: &str, features: &str) -> Option<WindowId> {
        let mut record = self.record.borrow_mut();
        let allowed = if target == "_blank" {
            record.allow_tabs
        } else {
            record.allow_popups
        };
        if !allowed {
            return None;
        }
        record
            .opened
            .push((url.to_string(), target.to_string(), features.to_string()));
        record.next_window += 1;
        Some(WindowId(record.next_window))
    }

    fn write_document(&mut self, window: WindowId, html: &str) {
        self.record
            .borrow_mut()
            .documents
            .push((window, html.to_string()));
    }

    fn navigate_window(&mut self, window: WindowId, url: &str) {
        self.record
            .borrow_mut()
            .window_navigations
            .push((Instant::now(), window, url.to_string()));
    }

    fn focus_window(&mut self, window: WindowId) {
        self.record.borrow_mut().focused.push(window);
    }

    fn is_window_closed(&self, window: WindowId) -> bool {
        self.record.borrow().closed.contains(&window)
    }

    fn show_instruction(&mut self, message: &str) {
        self.record
            .borrow_mut()
            .instructions
            .push(message.to_string());
    }

    fn write_clipboard_text(&mut self, text: &str) -> Result<(), PlatformError> {
        let mut record = self.record.borrow_mut();
        if !record.clipboard_ok {
            return Err(PlatformError::ClipboardUnavailable(
                "permission denied".to_string(),
            ));
        }
        record.clipboard.push(text.to_string());
        Ok(())
    }
}
