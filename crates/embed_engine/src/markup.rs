//! HTML produced for the host: the fallback node, the popup's interim
//! loading document and short status texts.
//!
//! Links are user data. They are escaped for HTML text and attributes, and
//! for single-quoted script literals inside `onclick` handlers.

use std::fmt::Write as _;

use embed_core::{
    FallbackAction, FallbackReason, FallbackView, LoadingNotice, Toast, FALLBACK_MARKER_CLASS,
};

use crate::bridge::{
    COPY_LINK_TO_CLIPBOARD, FORCE_IFRAME_LOAD, OPEN_OPTIMIZED_POPUP, RETRY_AUTHENTICATED_EMBED,
};

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Single-quoted script string literal.
pub fn js_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\u0022"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '<' => out.push_str("\\u003C"),
            '>' => out.push_str("\\u003E"),
            '&' => out.push_str("\\u0026"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

fn reason_slug(reason: FallbackReason) -> &'static str {
    match reason {
        FallbackReason::InvalidLink => "invalid-link",
        FallbackReason::PublicLinkPolicy => "public-link-policy",
        FallbackReason::AuthenticationRequired => "authentication-required",
        FallbackReason::EmbedUnavailable => "embed-unavailable",
        FallbackReason::ForcedEmbedFailed => "forced-embed-failed",
    }
}

fn operation_button(html: &mut String, operation: &str, link: &str, class: &str, label: &str) {
    let call = format!("{operation}({})", js_string(link));
    let _ = write!(
        html,
        r#"<button type="button" class="btn {class}" data-op="{operation}" onclick="{}">{label}</button>"#,
        escape_html(&call)
    );
}

fn action_markup(html: &mut String, action: FallbackAction, link: &str) {
    match action {
        FallbackAction::OpenPopup => operation_button(
            html,
            OPEN_OPTIMIZED_POPUP,
            link,
            "btn-primary",
            "Open in popup",
        ),
        FallbackAction::OpenNewTab => {
            let _ = write!(
                html,
                r#"<a class="btn btn-outline-primary" href="{}" target="_blank" rel="noopener noreferrer">Open in new tab</a>"#,
                escape_html(link)
            );
        }
        FallbackAction::RetryAuthenticated => operation_button(
            html,
            RETRY_AUTHENTICATED_EMBED,
            link,
            "btn-outline-secondary",
            "Try again",
        ),
        FallbackAction::ForceEmbed => operation_button(
            html,
            FORCE_IFRAME_LOAD,
            link,
            "btn-outline-warning",
            "Try embedding anyway",
        ),
        FallbackAction::CopyLink => operation_button(
            html,
            COPY_LINK_TO_CLIPBOARD,
            link,
            "btn-outline-secondary",
            "Copy link",
        ),
    }
}

/// The single node inserted into the panel body when embedding is abandoned.
pub fn fallback_markup(view: &FallbackView) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<div class="{FALLBACK_MARKER_CLASS} text-center p-4" data-reason="{}">"#,
        reason_slug(view.reason)
    );
    let _ = write!(html, "<h4>{}</h4>", escape_html(view.headline));
    let _ = write!(html, "<p>{}</p>", escape_html(&view.explanation));
    if let Some(note) = view.note {
        let _ = write!(html, r#"<p class="text-muted small">{}</p>"#, escape_html(note));
    }
    if let Some(link) = view.link.as_deref() {
        if !view.actions.is_empty() {
            html.push_str(r#"<div class="d-grid gap-2">"#);
            for action in &view.actions {
                action_markup(&mut html, *action, link);
            }
            html.push_str("</div>");
        }
    }
    if let Some(tip) = view.tip {
        let _ = write!(html, r#"<p class="small mt-3">{}</p>"#, escape_html(tip));
    }
    if let Some((summary, body)) = view.details {
        let _ = write!(
            html,
            "<details><summary>{}</summary><p>{}</p></details>",
            escape_html(summary),
            escape_html(body)
        );
    }
    html.push_str("</div>");
    html
}

/// Interim document written into a freshly opened popup before it is
/// navigated to the report.
pub fn loading_document(link: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Loading report</title>\
         <style>body{{margin:0;height:100vh;display:flex;align-items:center;\
         justify-content:center;font-family:sans-serif;background:#f3f2f1;color:#323130}}\
         </style></head><body><div><h2>Loading report</h2>\
         <p>You will be redirected in a moment.</p>\
         <p><small>{}</small></p></div></body></html>",
        escape_html(link)
    )
}

pub fn loading_notice_text(notice: LoadingNotice) -> &'static str {
    match notice {
        LoadingNotice::Standard => "Loading report...",
        LoadingNotice::Authenticating => "Loading report. Signing in may take a moment...",
    }
}

pub fn toast_text(toast: Toast) -> &'static str {
    match toast {
        Toast::EmbedSucceeded => "Report loaded",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOSTILE: &str = "https://app.powerbi.com/view?r=a'\"><script>alert(1)</script>";

    #[test]
    fn escapes_html_specials() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn js_literal_cannot_break_out() {
        let literal = js_string("a'b\\c</script>");
        assert_eq!(literal, r"'a\'b\\c\u003C/script\u003E'");
    }

    #[test]
    fn fallback_carries_marker_and_actions() {
        let view = FallbackView::for_reason(
            FallbackReason::AuthenticationRequired,
            "https://app.powerbi.com/reportEmbed?autoAuth=true",
        );
        let html = fallback_markup(&view);
        assert!(html.starts_with(&format!(r#"<div class="{FALLBACK_MARKER_CLASS} "#)));
        assert!(html.contains(r#"data-reason="authentication-required""#));
        for op in [OPEN_OPTIMIZED_POPUP, RETRY_AUTHENTICATED_EMBED, COPY_LINK_TO_CLIPBOARD] {
            assert!(html.contains(&format!(r#"data-op="{op}""#)), "{op}");
        }
        assert!(!html.contains(FORCE_IFRAME_LOAD));
        assert!(html.contains(r#"target="_blank""#));
    }

    #[test]
    fn hostile_link_stays_inert() {
        let html = fallback_markup(&FallbackView::for_reason(
            FallbackReason::PublicLinkPolicy,
            HOSTILE,
        ));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("a'\""));
        assert!(!loading_document(HOSTILE).contains("<script>"));
    }

    #[test]
    fn invalid_link_view_has_no_buttons() {
        let html = fallback_markup(&FallbackView::invalid_link(&embed_core::LinkError::Empty));
        assert!(!html.contains("<button"));
        assert!(html.contains("Invalid link"));
    }

    #[test]
    fn status_texts() {
        assert_ne!(
            loading_notice_text(LoadingNotice::Standard),
            loading_notice_text(LoadingNotice::Authenticating)
        );
        assert_eq!(toast_text(Toast::EmbedSucceeded), "Report loaded");
    }
}
