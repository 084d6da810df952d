use serde::{Deserialize, Serialize};

/// Deny/allow — the only two list types; legacy "black/white" names from
/// upstream documentation are not carried into this codebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Deny,
    Allow,
}

/// How a list source's content is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListSourceKind {
    Text,
    File,
    Http,
}

/// `{type: text|file|http, from: string}` — §6 list source descriptor.
/// `text` carries inline content separated by newlines, `file` a filesystem
/// path, `http(s)` a URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListSourceDescriptor {
    #[serde(rename = "type")]
    pub kind: ListSourceKind,
    pub from: String,
}

impl ListSourceDescriptor {
    pub fn text(content: impl Into<String>) -> Self {
        Self { kind: ListSourceKind::Text, from: content.into() }
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self { kind: ListSourceKind::File, from: path.into() }
    }

    pub fn http(url: impl Into<String>) -> Self {
        Self { kind: ListSourceKind::Http, from: url.into() }
    }

    /// A label used in logging/events; the URL for http sources, the path
    /// for file sources, and a fixed marker for inline text.
    pub fn label(&self) -> &str {
        match self.kind {
            ListSourceKind::Text => "<inline>",
            ListSourceKind::File | ListSourceKind::Http => &self.from,
        }
    }
}
