//! OCTA GST pull client with fixed-count retry

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

use super::http::{HttpTransport, PullBody, PullRequest, Transport};
use super::response::{classify, classify_transport};
use super::{ClientError, PullApi, PullFailure, PullOutcome};
use crate::config::PullConfig;
use crate::identifier::Gstin;
use crate::period::ReturnPeriod;

/// Pull client for the OCTA GST API.
///
/// `max_attempts` counts every request, the first one included: with the
/// default of 3, a pull that keeps failing transiently is sent three times
/// with `retry_delay` slept twice.
pub struct OctaClient<T = HttpTransport> {
    transport: T,
    max_attempts: u32,
    retry_delay: Duration,
}

impl OctaClient<HttpTransport> {
    /// Client talking to the real API as configured.
    pub fn from_config(config: &PullConfig) -> Result<Self, ClientError> {
        Ok(Self::with_transport(HttpTransport::new(config)?, config))
    }
}

impl<T: Transport> OctaClient<T> {
    /// Client over any transport, taking retry settings from `config`.
    pub fn with_transport(transport: T, config: &PullConfig) -> Self {
        Self::new(transport, config.attempts(), config.retry_delay)
    }

    /// Client with explicit retry settings. `max_attempts` of 0 is treated as 1.
    pub fn new(transport: T, max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            transport,
            max_attempts: max_attempts.max(1),
            retry_delay,
        }
    }

    /// Total attempts per pull
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay between attempts
    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn attempt(&self, request: &PullRequest) -> PullOutcome {
        match self.transport.send(request).await {
            Ok(response) => classify(&response, request),
            Err(e) => Err(classify_transport(&e)),
        }
    }
}

#[async_trait]
impl<T: Transport> PullApi for OctaClient<T> {
    async fn pull(&self, company_id: &str, gstin: &str, period: ReturnPeriod) -> PullOutcome {
        let gstin = Gstin::parse(gstin).map_err(|e| PullFailure::Validation(e.to_string()))?;

        let request = PullRequest {
            company_id: company_id.to_string(),
            body: PullBody {
                gstin: gstin.to_string(),
                return_period: period.to_string(),
            },
        };

        let mut attempt = 1;
        loop {
            match self.attempt(&request).await {
                Ok(job_id) => {
                    debug!("Pull accepted on attempt {}: job {}", attempt, job_id);
                    return Ok(job_id);
                }
                Err(failure) if failure.is_transient() && attempt < self.max_attempts => {
                    warn!(
                        "Retrying (attempt {}/{}) after {} - waiting {:.1} seconds... ({} {})",
                        attempt + 1,
                        self.max_attempts,
                        failure,
                        self.retry_delay.as_secs_f64(),
                        company_id,
                        period
                    );
                    tokio::time::sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(failure) => {
                    if failure.is_transient() {
                        warn!(
                            "Pull failed after {} attempts ({} {}): {}",
                            attempt, company_id, period, failure
                        );
                    }
                    return Err(failure);
                }
            }
        }
    }
}
