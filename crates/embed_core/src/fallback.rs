use crate::link::LinkError;
use crate::session::Strategy;

/// Class carried by the single fallback node in the panel body.
pub const FALLBACK_MARKER_CLASS: &str = "report-fallback";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackReason {
    InvalidLink,
    /// The service never embeds public view links.
    PublicLinkPolicy,
    /// An authenticated embed produced no content; the user likely has to sign in.
    AuthenticationRequired,
    /// A plain embed attempt timed out, errored or verified empty.
    EmbedUnavailable,
    ForcedEmbedFailed,
}

impl FallbackReason {
    pub fn for_strategy(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Quick => FallbackReason::EmbedUnavailable,
            Strategy::Authenticated => FallbackReason::AuthenticationRequired,
            Strategy::Forced => FallbackReason::ForcedEmbedFailed,
        }
    }
}

/// Buttons offered by the fallback view, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackAction {
    OpenPopup,
    OpenNewTab,
    RetryAuthenticated,
    ForceEmbed,
    CopyLink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackView {
    pub reason: FallbackReason,
    /// Absent only for the invalid-link view.
    pub link: Option<String>,
    pub headline: &'static str,
    pub explanation: String,
    pub note: Option<&'static str>,
    pub tip: Option<&'static str>,
    /// Collapsible "why" section: summary line and body.
    pub details: Option<(&'static str, &'static str)>,
    pub actions: Vec<FallbackAction>,
}

impl FallbackView {
    pub fn invalid_link(err: &LinkError) -> Self {
        Self {
            reason: FallbackReason::InvalidLink,
            link: None,
            headline: "Invalid link",
            explanation: format!("This is not a valid report link ({err})."),
            note: None,
            tip: Some("Check the link stored for this client and try again."),
            details: None,
            actions: Vec::new(),
        }
    }

    pub fn for_reason(reason: FallbackReason, link: &str) -> Self {
        let link = Some(link.to_string());
        match reason {
            FallbackReason::InvalidLink => Self {
                reason,
                link,
                ..Self::invalid_link(&LinkError::Empty)
            },
            FallbackReason::PublicLinkPolicy => Self {
                reason,
                link,
                headline: "Embedding blocked",
                explanation: "Public report links cannot be embedded because of the \
                              report service's security policy."
                    .to_string(),
                note: Some("This is a limitation of the report service, not of this application."),
                tip: Some("The popup keeps you inside the application and is the recommended option."),
                details: Some((
                    "Why doesn't it work embedded?",
                    "The report service refuses to show public links (ending in /view?r=) \
                     inside frames. Use the options above to open the report safely.",
                )),
                actions: vec![
                    FallbackAction::OpenPopup,
                    FallbackAction::OpenNewTab,
                    FallbackAction::CopyLink,
                ],
            },
            FallbackReason::AuthenticationRequired => Self {
                reason,
                link,
                headline: "Sign-in required",
                explanation: "This report requires you to be signed in to the report service."
                    .to_string(),
                note: Some("Sign in with your organisation account to view this content."),
                tip: Some("After signing in from another tab, choose \"Try again\"."),
                details: Some((
                    "Why do I need to sign in?",
                    "The report contains protected data. Use the popup or a new tab to sign \
                     in, then try embedding again.",
                )),
                actions: vec![
                    FallbackAction::OpenPopup,
                    FallbackAction::OpenNewTab,
                    FallbackAction::RetryAuthenticated,
                    FallbackAction::CopyLink,
                ],
            },
            FallbackReason::EmbedUnavailable => Self {
                reason,
                link,
                headline: "Embedding blocked",
                explanation: "This report link cannot be embedded directly.".to_string(),
                note: Some("This is a limitation of the report service, not of this application."),
                tip: Some("The popup keeps you inside the application and is the recommended option."),
                details: None,
                actions: vec![
                    FallbackAction::OpenPopup,
                    FallbackAction::OpenNewTab,
                    FallbackAction::CopyLink,
                ],
            },
            FallbackReason::ForcedEmbedFailed => Self {
                reason,
                link,
                headline: "Report",
                explanation: "For security reasons the report service blocks direct embedding."
                    .to_string(),
                note: None,
                tip: Some("The popup keeps you inside the application and is the recommended option."),
                details: None,
                actions: vec![
                    FallbackAction::OpenPopup,
                    FallbackAction::OpenNewTab,
                    FallbackAction::ForceEmbed,
                    FallbackAction::CopyLink,
                ],
            },
        }
    }

    pub fn offers(&self, action: FallbackAction) -> bool {
        self.actions.contains(&action)
    }
}

/// Variant of the loading indicator shown while an attempt runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingNotice {
    Standard,
    /// Longer-running attempt that may involve a sign-in round trip.
    Authenticating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toast {
    EmbedSucceeded,
}
