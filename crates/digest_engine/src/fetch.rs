use std::time::Duration;

use digest_core::{BrowserSettings, DEFAULT_USER_AGENT};
use futures_util::StreamExt;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use scraper::{Html, Selector};

use crate::decode::decode_html;
use crate::{FailureKind, FetchError, FetchedPage, PageRequest, WaitForSelector};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Budget for loading one page, excluding the selector wait.
    pub navigation_timeout: Duration,
    pub max_bytes: u64,
    pub user_agent: String,
    /// Headless rendering only: abort image, stylesheet, font and media requests.
    pub block_resources: bool,
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            navigation_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            block_resources: true,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
        }
    }
}

impl FetchSettings {
    pub fn from_browser(browser: &BrowserSettings) -> Self {
        Self {
            navigation_timeout: browser.page_timeout,
            user_agent: browser.user_agent.clone(),
            block_resources: browser.block_resources,
            ..Self::default()
        }
    }
}

/// Loads a page and waits for the requested condition.
///
/// Implementations make exactly one attempt; failures come back as
/// [`FetchError`] and the caller decides what to degrade.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<FetchedPage, FetchError>;
}

/// Plain HTTP fetcher. Sees only server-rendered markup; the selector wait is
/// checked once against the static document.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl HttpFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.navigation_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<FetchedPage, FetchError> {
        let parsed = reqwest::Url::parse(&request.url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .header(USER_AGENT, &self.settings.user_agent)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(FetchError::new(
                    FailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let decoded = decode_html(&bytes, content_type.as_deref())
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;

        if let Some(wait) = &request.wait_for {
            ensure_selector_present(&decoded.html, wait)?;
        }

        Ok(FetchedPage {
            url: final_url,
            html: decoded.html,
        })
    }
}

fn ensure_selector_present(html: &str, wait: &WaitForSelector) -> Result<(), FetchError> {
    let selector = Selector::parse(&wait.selector).map_err(|err| {
        FetchError::new(
            FailureKind::InvalidSelector {
                selector: wait.selector.clone(),
            },
            err.to_string(),
        )
    })?;
    if Html::parse_document(html).select(&selector).next().is_none() {
        return Err(FetchError::new(
            FailureKind::SelectorTimeout {
                selector: wait.selector.clone(),
            },
            "selector not present in static document",
        ));
    }
    Ok(())
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
