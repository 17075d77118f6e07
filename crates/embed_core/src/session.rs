use crate::effect::{Effect, TimerKey};
use crate::error::EmbedError;
use crate::link::{LinkCategory, ReportLink};

pub type SessionId = u64;

/// Which attempt recipe a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Short timeout, one content check after load.
    Quick,
    /// Long timeout, two delayed checks plus a dimension poll.
    Authenticated,
    /// Restrictions stripped; revealed unconditionally, then checked once.
    Forced,
}

impl Strategy {
    pub fn for_category(category: LinkCategory) -> Option<Self> {
        match category {
            LinkCategory::PublicView => None,
            LinkCategory::AuthenticatedEmbed => Some(Strategy::Authenticated),
            LinkCategory::GenericEmbed | LinkCategory::Unknown => Some(Strategy::Quick),
        }
    }

    /// Whether the session listens for surface load/error notifications.
    pub fn observes_surface(self) -> bool {
        !matches!(self, Strategy::Forced)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Init,
    Configuring,
    Attempting,
    Verifying,
    Succeeded,
    Failed(EmbedError),
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed(_))
    }

    fn rank(&self) -> u8 {
        match self {
            Phase::Init => 0,
            Phase::Configuring => 1,
            Phase::Attempting => 2,
            Phase::Verifying => 3,
            Phase::Succeeded | Phase::Failed(_) => 4,
        }
    }
}

/// Timers a session may own. At most one of each kind is armed at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionTimer {
    Timeout,
    Settle,
    FirstCheck,
    SecondCheck,
    Poll,
    Reveal,
    ForcedCheck,
}

/// Why the host was asked to probe the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeCheck {
    QuickSettle,
    FirstCheck,
    SecondCheck,
    Poll,
    Forced,
}

/// Mutable record of one embedding attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptSession {
    id: SessionId,
    link: ReportLink,
    category: LinkCategory,
    strategy: Strategy,
    phase: Phase,
    loaded: bool,
    check_count: u32,
    armed: Vec<SessionTimer>,
}

impl AttemptSession {
    pub(crate) fn new(
        id: SessionId,
        link: ReportLink,
        category: LinkCategory,
        strategy: Strategy,
    ) -> Self {
        Self {
            id,
            link,
            category,
            strategy,
            phase: Phase::Init,
            loaded: false,
            check_count: 0,
            armed: Vec::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn link(&self) -> &ReportLink {
        &self.link
    }

    pub fn category(&self) -> LinkCategory {
        self.category
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn loaded(&self) -> bool {
        self.loaded
    }

    pub fn check_count(&self) -> u32 {
        self.check_count
    }

    pub fn is_concluded(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn armed_timers(&self) -> &[SessionTimer] {
        &self.armed
    }

    /// Moves forward through the phase order. Returns false, and leaves the
    /// phase alone, for any move that is not strictly forward.
    pub(crate) fn advance(&mut self, next: Phase) -> bool {
        if next.rank() <= self.phase.rank() {
            return false;
        }
        self.phase = next;
        true
    }

    /// Records the first load notification. Later ones are ignored.
    pub(crate) fn mark_loaded(&mut self) -> bool {
        if self.loaded {
            return false;
        }
        self.loaded = true;
        true
    }

    pub(crate) fn next_check(&mut self) -> u32 {
        self.check_count += 1;
        self.check_count
    }

    pub(crate) fn key(&self, timer: SessionTimer) -> TimerKey {
        TimerKey::Session {
            session: self.id,
            timer,
        }
    }

    pub(crate) fn arm(&mut self, timer: SessionTimer) -> TimerKey {
        if !self.armed.contains(&timer) {
            self.armed.push(timer);
        }
        self.key(timer)
    }

    pub fn is_armed(&self, timer: SessionTimer) -> bool {
        self.armed.contains(&timer)
    }

    /// Forgets a timer that fired or is being cancelled. Returns whether it
    /// was armed.
    pub(crate) fn disarm(&mut self, timer: SessionTimer) -> bool {
        let before = self.armed.len();
        self.armed.retain(|armed| *armed != timer);
        before != self.armed.len()
    }

    /// Cancels every armed timer and drops surface observers. Timers are
    /// drained, so a second call emits nothing.
    pub(crate) fn release(&mut self) -> Vec<Effect> {
        let mut effects: Vec<Effect> = self
            .armed
            .drain(..)
            .map(|timer| Effect::CancelTimer {
                key: TimerKey::Session {
                    session: self.id,
                    timer,
                },
            })
            .collect();
        if self.strategy.observes_surface() && !self.is_concluded() {
            effects.push(Effect::UnobserveSurface { session: self.id });
        }
        effects
    }

    /// First terminal transition wins; later calls return `None`.
    pub(crate) fn conclude(&mut self, outcome: Phase) -> Option<Vec<Effect>> {
        if self.is_concluded() || !outcome.is_terminal() {
            return None;
        }
        let effects = self.release();
        self.phase = outcome;
        Some(effects)
    }
}
