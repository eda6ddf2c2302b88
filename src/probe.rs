//! The green target group health probe.
//!
//! A `Prober` owns one HTTP client configured with the hook's timeouts and sends a
//! single GET through the load balancer with the blue/green test header set. The
//! listener rule matching that header forwards to the green target group, so the
//! response status tells whether the new revision is serving.

use std::time::Duration;

use reqwest::{StatusCode, Url};

use crate::config::{ProbeConfig, USER_AGENT};
use crate::error::ProbeError;
use crate::hook::HookStatus;

/// Issues the blue/green test request
#[derive(Debug, Clone)]
pub struct Prober {
    config: ProbeConfig,
    client: reqwest::Client,
}

impl Prober {
    /// Build the HTTP client for the given probe settings.
    ///
    /// The endpoint is not checked here; a missing or malformed endpoint surfaces
    /// on each probe as `FAILED`.
    pub fn new(config: &ProbeConfig) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .read_timeout(Duration::from_secs(config.read_timeout_seconds))
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(!config.tls_verify)
            .build()
            .map_err(ProbeError::Client)?;

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification disabled for probe requests");
        }

        Ok(Self {
            config: config.clone(),
            client,
        })
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// `{scheme}://{endpoint}{path}`, e.g. `https://my-alb.elb.amazonaws.com/`
    pub fn target_url(&self) -> Result<Url, ProbeError> {
        let endpoint = self.config.endpoint().ok_or(ProbeError::MissingEndpoint)?;
        let url = format!("{}://{}{}", self.config.scheme, endpoint, self.config.path);

        Url::parse(&url).map_err(|e| ProbeError::InvalidUrl {
            url,
            message: e.to_string(),
        })
    }

    /// Send the test request and return the response status
    pub async fn check(&self) -> Result<StatusCode, ProbeError> {
        let url = self.target_url()?;
        tracing::debug!(url = %url, "Sending blue/green test request");

        let response = self
            .client
            .get(url)
            .header(
                self.config.header_name.as_str(),
                self.config.header_value.as_str(),
            )
            .send()
            .await?;

        Ok(response.status())
    }

    /// Run the check and classify it. Never fails: errors become `FAILED`.
    pub async fn probe(&self) -> HookStatus {
        let result = self.check().await;

        match &result {
            Ok(status) => {
                tracing::info!(status = status.as_u16(), "Green target responded");
            }
            Err(e) => {
                tracing::error!(error = %e, kind = e.kind(), "Blue/green test request failed");
            }
        }

        let outcome = HookStatus::from_result(&result);
        tracing::info!(hook_status = %outcome, "Health check complete");
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prober(config: ProbeConfig) -> Prober {
        Prober::new(&config).unwrap()
    }

    #[test]
    fn test_target_url_defaults_to_https_root() {
        let p = prober(ProbeConfig::for_endpoint("my-alb-123.elb.amazonaws.com"));
        assert_eq!(
            p.target_url().unwrap().as_str(),
            "https://my-alb-123.elb.amazonaws.com/"
        );
    }

    #[test]
    fn test_target_url_trims_endpoint() {
        let p = prober(ProbeConfig::for_endpoint("  green.example.com\n"));
        assert_eq!(p.target_url().unwrap().as_str(), "https://green.example.com/");
    }

    #[test]
    fn test_target_url_with_port_and_path() {
        let config = ProbeConfig {
            scheme: "http".to_string(),
            path: "/healthz".to_string(),
            ..ProbeConfig::for_endpoint("127.0.0.1:8080")
        };
        let p = prober(config);
        assert_eq!(p.target_url().unwrap().as_str(), "http://127.0.0.1:8080/healthz");
    }

    #[test]
    fn test_target_url_missing_endpoint() {
        let p = prober(ProbeConfig::default());
        assert!(matches!(p.target_url(), Err(ProbeError::MissingEndpoint)));
    }

    #[test]
    fn test_target_url_malformed_endpoint() {
        let p = prober(ProbeConfig::for_endpoint("bad host name"));
        assert!(matches!(p.target_url(), Err(ProbeError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_probe_without_endpoint_fails_closed() {
        let p = prober(ProbeConfig::default());
        assert_eq!(p.probe().await, HookStatus::Failed);
    }
}
