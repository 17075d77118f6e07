/// Attributes the host applies to the embeddable surface before navigating.
///
/// `None` means "remove the attribute".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceConfig {
    pub sandbox: Option<String>,
    pub allow: Option<String>,
    pub referrer_policy: Option<String>,
    pub cross_origin: Option<String>,
    pub allow_fullscreen: bool,
    pub allow_transparency: bool,
    pub frame_border: Option<u32>,
    /// Stretch the surface to fill the panel body and drop its border.
    pub fill_panel: bool,
}

const PERMISSIVE_FEATURES: &[&str] = &[
    "microphone",
    "camera",
    "fullscreen",
    "display-capture",
    "autoplay",
    "encrypted-media",
    "clipboard-read",
    "clipboard-write",
    "geolocation",
];

fn feature_list(extra: &[&str]) -> String {
    PERMISSIVE_FEATURES
        .iter()
        .chain(extra)
        .copied()
        .collect::<Vec<_>>()
        .join("; ")
}

impl SurfaceConfig {
    /// Quick attempts: no sandbox, broad feature grants, relaxed referrer.
    pub fn permissive() -> Self {
        Self {
            sandbox: None,
            allow: Some(feature_list(&[])),
            referrer_policy: Some("unsafe-url".to_string()),
            cross_origin: None,
            allow_fullscreen: true,
            allow_transparency: true,
            frame_border: None,
            fill_panel: false,
        }
    }

    /// Authenticated attempts additionally send credentials so an existing
    /// sign-in on the service is reused.
    pub fn for_authentication() -> Self {
        Self {
            allow: Some(feature_list(&["cross-origin-isolated"])),
            cross_origin: Some("use-credentials".to_string()),
            fill_panel: true,
            ..Self::permissive()
        }
    }

    /// Forced attempts strip every attribute that could make the service
    /// refuse the frame.
    pub fn stripped() -> Self {
        Self {
            sandbox: None,
            allow: None,
            referrer_policy: None,
            cross_origin: None,
            allow_fullscreen: true,
            allow_transparency: true,
            frame_border: Some(0),
            fill_panel: false,
        }
    }
}
