// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::{
    fmt,
    future::Future,
    time::{Duration, Instant},
};

use log::{debug, info, warn};
use reqwest::{Client, Url};

use crate::{
    errors::TappError,
    result::{decode_response, ResultSet},
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/tapp";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3000;
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 20;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 120_000;

// Job ids are the server's route parameter ([\w-]+); anything else never reaches the network.
pub fn check_job_id(job_id: &str) -> Result<(), TappError> {
    let well_formed = !job_id.is_empty()
        && job_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if well_formed {
        Ok(())
    } else {
        Err(TappError::Validation(format!("malformed job id '{}'", job_id)))
    }
}

/// Routes of the prediction service, relative to one configurable base. The base may be
/// absolute (`http://host/tapp`) or relative (`/tapp`, `.`); relative ones are resolved by the
/// transport.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    base: String,
}

impl Endpoint {
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        Endpoint {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn predict_url(&self, job_id: &str) -> String {
        format!("{}/predict/{}", self.base, job_id)
    }

    pub fn mail_url(&self, job_id: &str) -> String {
        format!("{}/mail/{}", self.base, job_id)
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Endpoint::new(DEFAULT_BASE_URL)
    }
}

// The network seam. `HttpTransport` is the real thing; tests plug in canned responses.
pub trait Transport {
    fn get_text(&self, url: &str) -> impl Future<Output = Result<String, TappError>> + Send;

    fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> impl Future<Output = Result<(), TappError>> + Send;
}

pub struct HttpTransport {
    client: Client,
    origin: Option<Url>,
}

impl HttpTransport {
    pub fn new(timeout: Duration, origin: Option<&str>) -> Result<Self, TappError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TappError::Transport(format!("HTTP client build failed: {}", e)))?;
        let origin = match origin {
            Some(o) => Some(
                Url::parse(o).map_err(|e| TappError::Validation(format!("origin '{}': {}", o, e)))?,
            ),
            None => None,
        };
        Ok(HttpTransport { client, origin })
    }

    fn resolve(&self, url: &str) -> Result<Url, TappError> {
        match Url::parse(url) {
            Ok(u) => Ok(u),
            Err(_) => match &self.origin {
                Some(origin) => origin
                    .join(url)
                    .map_err(|e| TappError::Validation(format!("URL '{}': {}", url, e))),
                None => Err(TappError::Validation(format!(
                    "relative URL '{}' needs an origin",
                    url
                ))),
            },
        }
    }
}

impl Transport for HttpTransport {
    async fn get_text(&self, url: &str) -> Result<String, TappError> {
        let url = self.resolve(url)?;
        let resp = self.client.get(url).send().await?.error_for_status()?;
        Ok(resp.text().await?)
    }

    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<(), TappError> {
        let url = self.resolve(url)?;
        self.client
            .post(url)
            .form(form)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    Idle,
    Requesting,
    // Server answered, but the job is not done yet.
    Pending,
    Populated { count: usize, elapsed: Duration },
    Failed(String),
}

impl PollState {
    pub fn status_text(&self) -> &'static str {
        match self {
            PollState::Idle => "WAITING",
            PollState::Requesting => "CALCULATING...",
            PollState::Pending => "STILL CALCULATING",
            PollState::Populated { .. } => "CALCULATION FINISHED",
            PollState::Failed(_) => "FAILED",
        }
    }

    // Second status line: counts and timing, or the failure reason.
    pub fn progress_text(&self) -> String {
        match self {
            PollState::Populated { count, elapsed } => {
                format!("{} seqs | took {:.3} secs", count, elapsed.as_secs_f64())
            }
            PollState::Pending => String::from("The prediction is still running; try again later."),
            PollState::Failed(msg) => msg.clone(),
            PollState::Idle | PollState::Requesting => String::new(),
        }
    }
}

impl fmt::Display for PollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = self.progress_text();
        if progress.is_empty() {
            write!(f, "{}", self.status_text())
        } else {
            write!(f, "{} | {}", self.status_text(), progress)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollPolicy {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
        }
    }
}

pub struct ResultPoller<T: Transport> {
    endpoint: Endpoint,
    transport: T,
    state: PollState,
}

impl<T: Transport> ResultPoller<T> {
    pub fn new(endpoint: Endpoint, transport: T) -> Self {
        ResultPoller {
            endpoint,
            transport,
            state: PollState::Idle,
        }
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // One request. Transport and decoding problems end up in PollState::Failed, never in the
    // caller's lap; `None` means there is nothing to render (yet).
    pub async fn fetch_result(&mut self, job_id: &str) -> Option<ResultSet> {
        if let Err(e) = check_job_id(job_id) {
            self.state = PollState::Failed(e.to_string());
            return None;
        }
        let url = self.endpoint.predict_url(job_id);
        debug!("GET {}", url);
        self.state = PollState::Requesting;
        let started = Instant::now();

        let outcome = match self.transport.get_text(&url).await {
            Ok(body) => decode_response(&body),
            Err(e) => Err(e),
        };
        match outcome {
            Ok(Some(results)) => {
                let elapsed = started.elapsed();
                info!("{} results in {:?}", results.len(), elapsed);
                self.state = PollState::Populated {
                    count: results.len(),
                    elapsed,
                };
                Some(results)
            }
            Ok(None) => {
                debug!("job {} still pending", job_id);
                self.state = PollState::Pending;
                None
            }
            Err(e) => {
                warn!("fetching {} failed: {}", url, e);
                self.state = PollState::Failed(e.to_string());
                None
            }
        }
    }

    // Repeats fetch_result() while the job is pending, at most `policy.max_attempts` times.
    pub async fn poll_until_ready(&mut self, job_id: &str, policy: &PollPolicy) -> Option<ResultSet> {
        for attempt in 1..=policy.max_attempts.max(1) {
            if let Some(results) = self.fetch_result(job_id).await {
                return Some(results);
            }
            if self.state != PollState::Pending {
                return None;
            }
            if attempt < policy.max_attempts {
                debug!("attempt {}/{}: pending", attempt, policy.max_attempts);
                tokio::time::sleep(policy.interval).await;
            }
        }
        None
    }
}
