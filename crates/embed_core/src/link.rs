use std::fmt;

use url::Url;

/// How a report link is expected to behave when embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkCategory {
    /// Publicly shared view link; the service always refuses to embed these.
    PublicView,
    /// Embed link that asks the service to sign the user in automatically.
    AuthenticatedEmbed,
    /// Plain embed link.
    GenericEmbed,
    /// Anything else on the service's domain; handled like `GenericEmbed`.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    Empty,
    Malformed(String),
    ForeignDomain { host: Option<String> },
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkError::Empty => write!(f, "empty link"),
            LinkError::Malformed(reason) => write!(f, "malformed link: {reason}"),
            LinkError::ForeignDomain { host: Some(host) } => {
                write!(f, "link host {host} is not the report service")
            }
            LinkError::ForeignDomain { host: None } => write!(f, "link has no host"),
        }
    }
}

impl std::error::Error for LinkError {}

/// A report link that passed validation against the service domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLink {
    raw: String,
    url: Url,
}

impl ReportLink {
    /// Validates `raw` as an http(s) link whose host is `domain_marker` or one
    /// of its subdomains.
    pub fn parse(raw: &str, domain_marker: &str) -> Result<Self, LinkError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LinkError::Empty);
        }
        let url = Url::parse(trimmed).map_err(|err| LinkError::Malformed(err.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(LinkError::Malformed(format!(
                "unsupported scheme {}",
                url.scheme()
            )));
        }
        let host = url.host_str().map(str::to_ascii_lowercase);
        match host.as_deref() {
            Some(host) if host_matches(host, domain_marker) => Ok(Self {
                raw: trimmed.to_string(),
                url,
            }),
            _ => Err(LinkError::ForeignDomain { host }),
        }
    }

    /// The link exactly as the user supplied it (trimmed).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn category(&self) -> LinkCategory {
        classify(self)
    }
}

impl fmt::Display for ReportLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn host_matches(host: &str, marker: &str) -> bool {
    let marker = marker.trim_start_matches('.').to_ascii_lowercase();
    if marker.is_empty() {
        return false;
    }
    host == marker
        || host
            .strip_suffix(marker.as_str())
            .is_some_and(|prefix| prefix.ends_with('.'))
}

type Rule = (fn(&Url) -> bool, LinkCategory);

/// Evaluated top to bottom; the first matching predicate decides.
const RULES: &[Rule] = &[
    (is_public_view, LinkCategory::PublicView),
    (is_authenticated_embed, LinkCategory::AuthenticatedEmbed),
    (is_embed, LinkCategory::GenericEmbed),
];

pub fn classify(link: &ReportLink) -> LinkCategory {
    RULES
        .iter()
        .find(|(matches, _)| matches(link.url()))
        .map(|(_, category)| *category)
        .unwrap_or(LinkCategory::Unknown)
}

fn is_public_view(url: &Url) -> bool {
    let last_segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");
    last_segment.eq_ignore_ascii_case("view") && url.query_pairs().any(|(key, _)| key == "r")
}

fn is_embed(url: &Url) -> bool {
    url.path_segments()
        .is_some_and(|mut segments| segments.any(|s| s.eq_ignore_ascii_case("reportEmbed")))
}

fn is_authenticated_embed(url: &Url) -> bool {
    is_embed(url)
        && url
            .query_pairs()
            .any(|(key, value)| key == "autoAuth" && value.eq_ignore_ascii_case("true"))
}
