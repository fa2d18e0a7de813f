use std::time::Duration;

use serde::Serialize;

use crate::fetch::{map_reqwest_error, FetchSettings, PageFetcher};
use crate::{FailureKind, FetchError, FetchedPage, PageRequest, WaitUntil};

/// Resource types dropped while rendering when `block_resources` is on.
const BLOCKED_RESOURCE_TYPES: &[&str] = &["image", "stylesheet", "font", "media"];

/// Headroom on top of the browser-side timeouts for the HTTP round trip.
const TRANSPORT_SLACK: Duration = Duration::from_secs(10);

/// Headless-browser fetcher backed by a Browserless `/content` endpoint, which
/// returns the fully rendered HTML of a page.
pub struct BrowserlessFetcher {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    settings: FetchSettings,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContentRequest<'a> {
    url: &'a str,
    goto_options: GotoOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    wait_for_selector: Option<SelectorWait<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    reject_resource_types: Vec<&'static str>,
    user_agent: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GotoOptions {
    wait_until: WaitUntil,
    timeout: u64,
}

#[derive(Debug, Serialize)]
struct SelectorWait<'a> {
    selector: &'a str,
    timeout: u64,
}

impl BrowserlessFetcher {
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        settings: FetchSettings,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
            settings,
        })
    }

    fn endpoint(&self) -> String {
        let mut endpoint = format!("{}/content", self.base_url);
        if let Some(token) = &self.token {
            endpoint.push_str(&format!("?token={token}"));
        }
        endpoint
    }

    fn request_body<'a>(&'a self, request: &'a PageRequest) -> ContentRequest<'a> {
        ContentRequest {
            url: &request.url,
            goto_options: GotoOptions {
                wait_until: request.wait_until,
                timeout: millis(self.settings.navigation_timeout),
            },
            wait_for_selector: request.wait_for.as_ref().map(|wait| SelectorWait {
                selector: &wait.selector,
                timeout: millis(wait.timeout),
            }),
            reject_resource_types: if self.settings.block_resources {
                BLOCKED_RESOURCE_TYPES.to_vec()
            } else {
                Vec::new()
            },
            user_agent: &self.settings.user_agent,
        }
    }

    fn transport_timeout(&self, request: &PageRequest) -> Duration {
        let selector_wait = request
            .wait_for
            .as_ref()
            .map(|wait| wait.timeout)
            .unwrap_or_default();
        self.settings.navigation_timeout + selector_wait + TRANSPORT_SLACK
    }
}

#[async_trait::async_trait]
impl PageFetcher for BrowserlessFetcher {
    async fn fetch_page(&self, request: &PageRequest) -> Result<FetchedPage, FetchError> {
        reqwest::Url::parse(&request.url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let response = self
            .client
            .post(self.endpoint())
            .timeout(self.transport_timeout(request))
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), message, request));
        }

        let html = response.text().await.map_err(map_reqwest_error)?;
        Ok(FetchedPage {
            url: request.url.clone(),
            html,
        })
    }
}

/// Browserless reports navigation and selector timeouts as failed requests;
/// tell them apart from other errors by status and message.
fn classify_failure(status: u16, message: String, request: &PageRequest) -> FetchError {
    let timed_out = status == 408 || message.contains("TimeoutError") || message.contains("timeout");
    match (&request.wait_for, timed_out) {
        (Some(wait), true) if message.contains(&wait.selector) || status == 408 => FetchError::new(
            FailureKind::SelectorTimeout {
                selector: wait.selector.clone(),
            },
            message,
        ),
        (_, true) => FetchError::new(FailureKind::Timeout, message),
        _ => FetchError::new(FailureKind::HttpStatus(status), message),
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
