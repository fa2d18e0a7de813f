use std::fmt;
use std::time::Duration;

use digest_core::BoardKind;
use serde::Serialize;

/// Navigation milestone a fetch waits for before the document is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WaitUntil {
    #[serde(rename = "load")]
    Load,
    #[serde(rename = "domcontentloaded")]
    DomContentLoaded,
    /// No more than two network connections for 500 ms.
    #[serde(rename = "networkidle2")]
    NetworkIdle2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitForSelector {
    pub selector: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub url: String,
    pub wait_until: WaitUntil,
    pub wait_for: Option<WaitForSelector>,
}

impl PageRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            wait_until: WaitUntil::Load,
            wait_for: None,
        }
    }

    pub fn wait_until(mut self, wait_until: WaitUntil) -> Self {
        self.wait_until = wait_until;
        self
    }

    pub fn wait_for(mut self, selector: impl Into<String>, timeout: Duration) -> Self {
        self.wait_for = Some(WaitForSelector {
            selector: selector.into(),
            timeout,
        });
        self
    }
}

/// A loaded document, as UTF-8 HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestEvent {
    HomepageScraped {
        headlines: usize,
    },
    HomepageFailed {
        reason: String,
    },
    BoardScraped {
        kind: BoardKind,
        board_id: String,
        name: String,
        posts: usize,
    },
    BoardFailed {
        kind: BoardKind,
        board_id: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    SelectorTimeout { selector: String },
    InvalidSelector { selector: String },
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::SelectorTimeout { selector } => {
                write!(f, "selector {selector} did not appear")
            }
            FailureKind::InvalidSelector { selector } => write!(f, "invalid selector {selector}"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Decode => write!(f, "decode error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
