use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info};

/// Substituted when the lookup fails
pub const IP_FAILURE: &str = "IP Failure";

#[derive(Debug, Deserialize)]
struct IpResponse {
    ip: String,
}

/// Looks up this host's public address through an ipify-style JSON endpoint.
///
/// Never fails: any transport or decoding problem is logged and replaced by
/// [`IP_FAILURE`] so startup can continue.
pub async fn resolve_public_ip(url: &str, timeout: Duration) -> String {
    match fetch(url, timeout).await {
        Ok(ip) => {
            info!(ip = %ip, "Resolved public IP");
            ip
        }
        Err(e) => {
            error!(error = %e, "Error fetching public IP");
            IP_FAILURE.to_string()
        }
    }
}

async fn fetch(url: &str, timeout: Duration) -> Result<String, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    let body: IpResponse = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(body.ip)
}
