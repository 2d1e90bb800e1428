//! Report retrieval from the exchange endpoint.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::http_client::{HttpClient, HttpRequest};
use crate::{RawReport, ScreenError, TradeDate};

/// Query value selecting the HTML rendering of the report.
pub const RESPONSE_FORMAT: &str = "html";
/// Query value selecting every session category except warrants.
pub const REPORT_TYPE: &str = "ALLBUT0999";

/// Fetches the daily all-sessions report through an [`HttpClient`].
#[derive(Clone)]
pub struct ReportFetcher {
    http_client: Arc<dyn HttpClient>,
    config: FetchConfig,
}

impl ReportFetcher {
    pub fn new(http_client: Arc<dyn HttpClient>, config: FetchConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn request_for(&self, date: TradeDate) -> HttpRequest {
        HttpRequest::get(&self.config.endpoint)
            .with_query("response", RESPONSE_FORMAT)
            .with_query("date", date.compact())
            .with_query("type", REPORT_TYPE)
            .with_header("user-agent", &self.config.user_agent)
            .with_timeout_ms(self.config.timeout_ms)
    }

    /// Issue a single request for `date`. No retries are attempted.
    ///
    /// # Errors
    ///
    /// - `Network` on transport failure, timeout or a non-success status
    /// - `InsufficientData` when the body is shorter than `min_body_len`
    pub async fn fetch_report(&self, date: TradeDate) -> Result<RawReport, ScreenError> {
        let request = self.request_for(date);
        debug!(url = %request.full_url(), "requesting daily report");

        let response = self.http_client.execute(request).await.map_err(|error| {
            if error.is_timeout() {
                ScreenError::network(format!("report request timed out: {}", error.message()))
            } else {
                ScreenError::network(format!("report transport error: {}", error.message()))
            }
        })?;

        if !response.is_success() {
            return Err(ScreenError::network(format!(
                "report endpoint returned status {}",
                response.status
            )));
        }

        let body_len = response.body.chars().count();
        if body_len < self.config.min_body_len {
            warn!(%date, body_len, "report body too short; market likely closed");
            return Err(ScreenError::insufficient_data(format!(
                "no trading data for {date} (body of {body_len} chars, need at least {})",
                self.config.min_body_len
            )));
        }

        debug!(%date, body_len, "report received");
        Ok(RawReport::new(date, response.body))
    }
}
