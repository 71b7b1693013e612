// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::sync::{Arc, OnceLock};

use log::{info, warn};
use regex::Regex;
use tokio::task::JoinHandle;

use crate::{
    errors::TappError,
    poller::{check_job_id, Endpoint, Transport},
};

// Local part starts with an alphanumeric; the domain needs at least one dot-separated segment.
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9._%+-]*@[A-Za-z0-9][A-Za-z0-9-]*(\.[A-Za-z0-9-]+)+$";

static EMAIL_REGEX: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();

// Compiled on first use, then shared.
fn email_regex() -> Result<&'static Regex, TappError> {
    EMAIL_REGEX
        .get_or_init(|| Regex::new(EMAIL_PATTERN))
        .as_ref()
        .map_err(|e| TappError::Format(e.to_string()))
}

pub fn check_email(address: &str) -> Result<(), TappError> {
    let re = email_regex()?;
    if re.is_match(address) {
        Ok(())
    } else {
        Err(TappError::Validation(format!(
            "'{}' does not look like an e-mail address",
            address
        )))
    }
}

// Asks the service to mail `address` when job `job_id` completes.
pub async fn send_notification<T: Transport>(
    transport: &T,
    endpoint: &Endpoint,
    job_id: &str,
    address: &str,
) -> Result<(), TappError> {
    check_job_id(job_id)?;
    check_email(address)?;
    let url = endpoint.mail_url(job_id);
    info!("POST {} (notification)", url);
    transport.post_form(&url, &[("email", address)]).await
}

// Fire-and-forget: input is checked up front (so the user sees mistakes), the request itself runs
// detached and its outcome is only logged.
pub fn spawn_notification<T>(
    transport: Arc<T>,
    endpoint: Endpoint,
    job_id: String,
    address: String,
) -> Result<JoinHandle<()>, TappError>
where
    T: Transport + Send + Sync + 'static,
{
    check_job_id(&job_id)?;
    check_email(&address)?;
    Ok(tokio::spawn(async move {
        if let Err(e) = send_notification(transport.as_ref(), &endpoint, &job_id, &address).await {
            warn!("notification for job {} not sent: {}", job_id, e);
        }
    }))
}
