use embed_core::PanelView;
use embed_logging::{embed_debug, embed_info};

use crate::markup;
use crate::platform::ReportPanel;

/// Pushes view changes to the host, touching only what differs from the
/// last rendered view.
#[derive(Debug, Default)]
pub(crate) struct PanelRenderer {
    shown: PanelView,
}

impl PanelRenderer {
    pub(crate) fn apply(&mut self, panel: &mut dyn ReportPanel, next: &PanelView) {
        if next.loading != self.shown.loading {
            panel.set_loading(next.loading.map(markup::loading_notice_text));
        }
        if next.surface_visible != self.shown.surface_visible {
            embed_debug!("surface visible: {}", next.surface_visible);
            panel.set_surface_visible(next.surface_visible);
        }
        if next.fallback != self.shown.fallback {
            // At most one fallback node: always remove before inserting.
            panel.remove_fallback();
            if let Some(view) = &next.fallback {
                embed_info!("showing fallback ({:?})", view.reason);
                panel.insert_fallback(&markup::fallback_markup(view));
            }
        }
        if next.toast != self.shown.toast {
            panel.set_toast(next.toast.map(markup::toast_text));
        }
        if next.copy_acknowledged != self.shown.copy_acknowledged {
            panel.set_copy_acknowledged(next.copy_acknowledged);
        }
        self.shown = next.clone();
    }
}
