//! Effect executor for the embed core: timers on tokio, host capability
//! traits, fallback markup, settings files and the host command bridge.
mod bridge;
mod config;
pub mod markup;
mod orchestrator;
mod platform;
mod render;
mod timers;

pub use bridge::{BridgeError, HostCommand, GLOBAL_OPERATIONS};
pub use config::{load_settings, load_settings_or_default, parse_settings, validate, ConfigError};
pub use orchestrator::{Orchestrator, OrchestratorHandle};
pub use platform::{Platform, PlatformError, ReportPanel, SurfaceObserver};
pub use timers::TimerService;
