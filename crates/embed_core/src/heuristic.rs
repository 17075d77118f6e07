//! Best-effort "did it load" judgment for a cross-origin surface.
//!
//! The embedded service never tells the host whether it rendered anything, and
//! the host may not look inside the surface. What remains are proxies: the
//! rendered box, and whether inspecting the content is allowed at all. Each
//! proxy is a [`VerificationSignal`]; a [`Verifier`] accepts a probe as soon as
//! any of its signals does.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::settings::Thresholds;

/// Rendered extent of the surface in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both axes reach `min`.
    pub fn covers(&self, min: Size) -> bool {
        self.width >= min.width && self.height >= min.height
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// What happened when the host tried to look inside the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inspection {
    /// Same-origin content with a document present.
    Document,
    /// Inspectable, but no document yet.
    Empty,
    /// The browser refused access to the content.
    Denied,
}

/// One snapshot of the live surface, taken by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceProbe {
    pub rendered: Size,
    pub inspection: Inspection,
}

impl SurfaceProbe {
    pub const fn new(rendered: Size, inspection: Inspection) -> Self {
        Self {
            rendered,
            inspection,
        }
    }
}

pub trait VerificationSignal: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;
    fn accepts(&self, probe: &SurfaceProbe) -> bool;
}

/// The surface grew to a plausible size.
#[derive(Debug, Clone, Copy)]
pub struct RenderedSize {
    pub min: Size,
}

impl VerificationSignal for RenderedSize {
    fn name(&self) -> &'static str {
        "rendered-size"
    }

    fn accepts(&self, probe: &SurfaceProbe) -> bool {
        probe.rendered.covers(self.min)
    }
}

/// Same-origin content is inspectable and a document exists.
#[derive(Debug, Clone, Copy)]
pub struct InspectableDocument;

impl VerificationSignal for InspectableDocument {
    fn name(&self) -> &'static str {
        "inspectable-document"
    }

    fn accepts(&self, probe: &SurfaceProbe) -> bool {
        probe.inspection == Inspection::Document
    }
}

/// Inspection was denied on a surface that has real extent. The service only
/// blocks inspection once it has rendered, so a denial on a sized surface
/// counts; a denial on a collapsed one does not.
#[derive(Debug, Clone, Copy)]
pub struct DeniedAfterRender {
    pub min: Size,
}

impl VerificationSignal for DeniedAfterRender {
    fn name(&self) -> &'static str {
        "denied-after-render"
    }

    fn accepts(&self, probe: &SurfaceProbe) -> bool {
        probe.inspection == Inspection::Denied && probe.rendered.covers(self.min)
    }
}

/// An ordered set of signals; any single acceptance is enough.
#[derive(Debug)]
pub struct Verifier {
    signals: Vec<Box<dyn VerificationSignal>>,
}

impl Verifier {
    pub fn new(signals: Vec<Box<dyn VerificationSignal>>) -> Self {
        Self { signals }
    }

    pub fn quick(thresholds: &Thresholds) -> Self {
        Self::new(vec![
            Box::new(RenderedSize {
                min: thresholds.quick,
            }),
            Box::new(InspectableDocument),
            Box::new(DeniedAfterRender {
                min: thresholds.access_denied,
            }),
        ])
    }

    pub fn authenticated(thresholds: &Thresholds) -> Self {
        Self::new(vec![
            Box::new(RenderedSize {
                min: thresholds.authenticated,
            }),
            Box::new(InspectableDocument),
            Box::new(DeniedAfterRender {
                min: thresholds.access_denied,
            }),
        ])
    }

    /// Dimension-only check used by the background poll.
    pub fn poll(thresholds: &Thresholds) -> Self {
        Self::new(vec![Box::new(RenderedSize {
            min: thresholds.poll,
        })])
    }

    /// Name of the first signal that accepts `probe`.
    pub fn accepting_signal(&self, probe: &SurfaceProbe) -> Option<&'static str> {
        self.signals
            .iter()
            .find(|signal| signal.accepts(probe))
            .map(|signal| signal.name())
    }

    pub fn looks_loaded(&self, probe: &SurfaceProbe) -> bool {
        self.accepting_signal(probe).is_some()
    }
}

/// The verifier set used by the attempt controller.
#[derive(Debug)]
pub struct Verifiers {
    pub quick: Verifier,
    pub authenticated: Verifier,
    pub poll: Verifier,
}

impl Verifiers {
    pub fn from_thresholds(thresholds: &Thresholds) -> Self {
        Self {
            quick: Verifier::quick(thresholds),
            authenticated: Verifier::authenticated(thresholds),
            poll: Verifier::poll(thresholds),
        }
    }
}

impl Default for Verifiers {
    fn default() -> Self {
        Self::from_thresholds(&Thresholds::default())
    }
}
