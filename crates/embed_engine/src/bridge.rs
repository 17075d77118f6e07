//! Named operations exposed to host scripts and inline fallback buttons.

use embed_core::Msg;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const LOAD_REPORT_SMART: &str = "loadReportSmart";
pub const OPEN_OPTIMIZED_POPUP: &str = "openOptimizedPopup";
pub const RETRY_AUTHENTICATED_EMBED: &str = "retryAuthenticatedEmbed";
pub const FORCE_IFRAME_LOAD: &str = "forceIframeLoad";
pub const COPY_LINK_TO_CLIPBOARD: &str = "copyLinkToClipboard";

pub const GLOBAL_OPERATIONS: [&str; 5] = [
    LOAD_REPORT_SMART,
    OPEN_OPTIMIZED_POPUP,
    RETRY_AUTHENTICATED_EMBED,
    FORCE_IFRAME_LOAD,
    COPY_LINK_TO_CLIPBOARD,
];

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),
    #[error("malformed host command: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One host call, e.g. `{"op":"openOptimizedPopup","link":"https://..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "link", rename_all = "camelCase")]
pub enum HostCommand {
    LoadReportSmart(String),
    OpenOptimizedPopup(String),
    RetryAuthenticatedEmbed(String),
    ForceIframeLoad(String),
    CopyLinkToClipboard(String),
}

impl HostCommand {
    pub fn from_call(operation: &str, link: impl Into<String>) -> Result<Self, BridgeError> {
        let link = link.into();
        Ok(match operation {
            LOAD_REPORT_SMART => HostCommand::LoadReportSmart(link),
            OPEN_OPTIMIZED_POPUP => HostCommand::OpenOptimizedPopup(link),
            RETRY_AUTHENTICATED_EMBED => HostCommand::RetryAuthenticatedEmbed(link),
            FORCE_IFRAME_LOAD => HostCommand::ForceIframeLoad(link),
            COPY_LINK_TO_CLIPBOARD => HostCommand::CopyLinkToClipboard(link),
            other => return Err(BridgeError::UnknownOperation(other.to_string())),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, BridgeError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn operation(&self) -> &'static str {
        match self {
            HostCommand::LoadReportSmart(_) => LOAD_REPORT_SMART,
            HostCommand::OpenOptimizedPopup(_) => OPEN_OPTIMIZED_POPUP,
            HostCommand::RetryAuthenticatedEmbed(_) => RETRY_AUTHENTICATED_EMBED,
            HostCommand::ForceIframeLoad(_) => FORCE_IFRAME_LOAD,
            HostCommand::CopyLinkToClipboard(_) => COPY_LINK_TO_CLIPBOARD,
        }
    }

    pub fn into_msg(self) -> Msg {
        match self {
            HostCommand::LoadReportSmart(link) => Msg::LoadReport(link),
            HostCommand::OpenOptimizedPopup(link) => Msg::OpenPopup(link),
            HostCommand::RetryAuthenticatedEmbed(link) => Msg::RetryAuthenticated(link),
            HostCommand::ForceIframeLoad(link) => Msg::ForceLoad(link),
            HostCommand::CopyLinkToClipboard(link) => Msg::CopyLink(link),
        }
    }
}
