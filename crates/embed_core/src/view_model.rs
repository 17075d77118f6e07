use crate::fallback::{FallbackView, LoadingNotice, Toast};
use crate::link::LinkCategory;
use crate::popup::LaunchStage;
use crate::session::{Phase, SessionId, Strategy};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelView {
    pub surface_visible: bool,
    pub loading: Option<LoadingNotice>,
    pub fallback: Option<FallbackView>,
    pub toast: Option<Toast>,
    pub copy_acknowledged: bool,
    pub session: Option<SessionSummary>,
    pub popup: Option<LaunchStage>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub id: SessionId,
    pub category: LinkCategory,
    pub strategy: Strategy,
    pub phase: Phase,
    pub check_count: u32,
}
