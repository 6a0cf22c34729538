use crate::archive::{dataframe_from_archive, save_archive};
use crate::config::ClientConfig;
use crate::constants::{AWARDS_PATH, BULK_DOWNLOAD_PATH, DOWNLOAD_STATUS_PATH};
use crate::errors::{AppError, AppResult};
use crate::filters::AwardFilters;
use crate::models::{StatusResponse, SubmitBody, SubmitResponse};
use crate::trace::{OperationTracer, SharedTracer, TraceScope};
use polars::prelude::DataFrame;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Async client for the USAspending bulk award download API.
///
/// All remote work happens on the server: the client assembles a filter
/// document, submits it, polls the export job until it finishes, then
/// downloads and unpacks the resulting archive. Control flow is strictly
/// sequential; a single instance is safe to reuse across independent
/// sequential calls (state is local to each call).
///
/// # Example
///
/// ```no_run
/// use usaspending::{client::UsaSpending, filters::AwardFilters};
///
/// # async fn example() -> Result<(), usaspending::errors::AppError> {
/// let client = UsaSpending::new();
/// let filters = AwardFilters::new()
///     .with_start_date("2019-10-01")
///     .with_end_date("2020-09-30")
///     .with_prime_award_type("A");
/// let table = client.bulk_awards(&filters).await?;
/// println!("{} award rows", table.height());
/// # Ok(())
/// # }
/// ```
pub struct UsaSpending {
    http: reqwest::Client,
    config: ClientConfig,
    tracer: Option<SharedTracer>,
}

impl Default for UsaSpending {
    fn default() -> Self {
        Self::new()
    }
}

impl UsaSpending {
    /// Creates a client pointing at the production USAspending API.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            config: ClientConfig::default(),
            tracer: None,
        }
    }

    /// Creates a client with a custom base URL. Used for testing against
    /// a mock server.
    pub fn with_base_url(base_url: &str) -> Self {
        let mut client = Self::new();
        client.config.base_url = base_url.trim_end_matches('/').to_string();
        client
    }

    /// Creates a client from an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the configuration fails validation
    /// (e.g. a zero poll budget).
    pub fn with_config(config: ClientConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            http: reqwest::Client::new(),
            config,
            tracer: None,
        })
    }

    /// Injects an observability hook invoked around each operation.
    pub fn with_tracer(mut self, tracer: Arc<dyn OperationTracer>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Submits a bulk-download request for award data.
    ///
    /// The filter document is sent as `{"filters": <document>}`. On
    /// acceptance (200) the response carries the export job's `file_name`;
    /// on rejection (e.g. 400 for missing award types) it carries the
    /// server's `message` instead. Non-success statuses are returned, not
    /// raised — inspect [`SubmitResponse::is_accepted`] or the status code.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` for transport failures and `InvalidInput`
    /// for unbuildable filter documents. Server rejections are not errors
    /// at this level.
    pub async fn submit_bulk_download(&self, filters: &AwardFilters) -> AppResult<SubmitResponse> {
        let mut scope = TraceScope::enter(self.tracer.as_ref(), "submit_bulk_download");
        let document = filters.to_document()?;

        let response = self
            .http
            .post(self.endpoint(BULK_DOWNLOAD_PATH))
            .timeout(self.config.request_timeout())
            .json(&json!({ "filters": document }))
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body: SubmitBody = serde_json::from_str(&text).unwrap_or_else(|_| SubmitBody {
            file_name: None,
            message: Some(truncate_body(&text)),
            file_url: None,
        });

        debug!(
            status = status,
            file_name = body.file_name.as_deref().unwrap_or(""),
            "Bulk download submitted"
        );

        scope.succeed();
        Ok(SubmitResponse {
            status,
            file_name: body.file_name,
            message: body.message,
            file_url: body.file_url,
        })
    }

    /// Checks the status of an export job. One query per call; the retry
    /// loop lives in the composed operations.
    ///
    /// # Errors
    ///
    /// Returns `RemoteRejected` for non-success statuses and `ParseError`
    /// for undecodable bodies.
    pub async fn bulk_download_status(&self, file_name: &str) -> AppResult<StatusResponse> {
        let mut scope = TraceScope::enter(self.tracer.as_ref(), "bulk_download_status");
        let url = self.endpoint(DOWNLOAD_STATUS_PATH);
        debug!(url = %url, file_name = file_name, "Checking export status");

        let response = self
            .http
            .get(url)
            .query(&[("file_name", file_name)])
            .timeout(self.config.request_timeout())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(AppError::RemoteRejected {
                status: status.as_u16(),
                message: truncate_body(&text),
            });
        }

        let record: StatusResponse = serde_json::from_str(&text)?;
        scope.succeed();
        Ok(record)
    }

    /// Fetches a single award record by its identifier.
    ///
    /// # Errors
    ///
    /// Returns `RemoteRejected` for non-success statuses and `ParseError`
    /// for undecodable bodies.
    pub async fn award(&self, award_id: &str) -> AppResult<serde_json::Value> {
        let mut scope = TraceScope::enter(self.tracer.as_ref(), "award");
        let response = self
            .http
            .get(format!("{}{}", self.endpoint(AWARDS_PATH), award_id))
            .timeout(self.config.request_timeout())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(AppError::RemoteRejected {
                status: status.as_u16(),
                message: truncate_body(&text),
            });
        }

        let document = serde_json::from_str(&text)?;
        scope.succeed();
        Ok(document)
    }

    /// Submits filters and drives the export to a parsed table:
    /// submit, poll until finished, download the archive, extract its
    /// single CSV member, parse into a DataFrame.
    ///
    /// # Errors
    ///
    /// - `RemoteRejected` when the server refuses the submission
    /// - `PollTimeout` when the poll budget runs out before `"finished"`
    /// - `ArchiveError` when the finished job has no download URL, the
    ///   archive has no CSV member, or the CSV fails to parse
    /// - `NetworkError` for transport failures at any stage
    pub async fn bulk_awards(&self, filters: &AwardFilters) -> AppResult<DataFrame> {
        let mut scope = TraceScope::enter(self.tracer.as_ref(), "bulk_awards");
        let file_url = self.resolve_download(filters).await?;
        let bytes = self.fetch_archive(&file_url).await?;
        let table = dataframe_from_archive(&bytes)?;
        info!(
            rows = table.height(),
            columns = table.width(),
            "Bulk award table ready"
        );
        scope.succeed();
        Ok(table)
    }

    /// Submits filters and saves the resulting archive, still zipped,
    /// verbatim to the destination path.
    ///
    /// # Errors
    ///
    /// Same as [`bulk_awards`](Self::bulk_awards), plus `IoError` when the
    /// destination cannot be written.
    pub async fn bulk_awards_to_file(
        &self,
        filters: &AwardFilters,
        destination: &Path,
    ) -> AppResult<()> {
        let mut scope = TraceScope::enter(self.tracer.as_ref(), "bulk_awards_to_file");
        let file_url = self.resolve_download(filters).await?;
        let bytes = self.fetch_archive(&file_url).await?;
        save_archive(&bytes, destination).await?;
        info!(
            destination = %destination.display(),
            size_bytes = bytes.len(),
            "Bulk award archive saved"
        );
        scope.succeed();
        Ok(())
    }

    /// Streams the completed archive into memory.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` for transport failures or non-success
    /// statuses from the file host.
    pub async fn fetch_archive(&self, file_url: &str) -> AppResult<Vec<u8>> {
        let mut response = self
            .http
            .get(file_url)
            .timeout(self.config.request_timeout())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AppError::NetworkError(format!("Failed to download archive: {e}")))?;

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            bytes.extend_from_slice(&chunk);
        }
        debug!(size_bytes = bytes.len(), "Archive downloaded");
        Ok(bytes)
    }

    /// Submit then poll, resolving to the finished job's download URL.
    async fn resolve_download(&self, filters: &AwardFilters) -> AppResult<String> {
        let submitted = self.submit_bulk_download(filters).await?;
        let file_name = match submitted.file_name {
            Some(name) => name,
            None => {
                let message = submitted
                    .message
                    .unwrap_or_else(|| "submit response carried no file_name".to_string());
                warn!(status = submitted.status, message = %message, "Bulk download rejected");
                return Err(AppError::RemoteRejected {
                    status: submitted.status,
                    message,
                });
            }
        };
        info!(file_name = %file_name, "Export job submitted");

        let record = self.poll_until_finished(&file_name).await?;
        record.file_url.ok_or_else(|| {
            AppError::ArchiveError("Export finished without a file_url".to_string())
        })
    }

    /// Polls the status endpoint until the job finishes or the attempt
    /// budget runs out. Any status other than `"finished"`, including
    /// unrecognized values, means keep polling.
    async fn poll_until_finished(&self, file_name: &str) -> AppResult<StatusResponse> {
        let attempts = self.config.poll_attempts;
        for attempt in 1..=attempts {
            let record = self.bulk_download_status(file_name).await?;
            if record.is_finished() {
                debug!(attempt = attempt, "Export finished");
                return Ok(record);
            }
            debug!(
                attempt = attempt,
                max_attempts = attempts,
                status = %record.status,
                "Export not finished yet"
            );
            if attempt < attempts {
                tokio::time::sleep(self.config.poll_delay()).await;
            }
        }

        warn!(
            attempts = attempts,
            file_name = file_name,
            "Poll budget exhausted before export finished"
        );
        Err(AppError::PollTimeout { attempts })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        return body.to_string();
    }
    // Never cut inside a multibyte character
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...[truncated]", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::truncate_body;

    #[test]
    fn test_truncate_body_short_passthrough() {
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn test_truncate_body_long_is_cut() {
        let long = "x".repeat(5000);
        let truncated = truncate_body(&long);
        assert!(truncated.len() < long.len());
        assert!(truncated.ends_with("...[truncated]"));
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        // 3-byte characters place a boundary mid-character at the cut point.
        let long = "€".repeat(1000);
        let truncated = truncate_body(&long);
        assert!(truncated.ends_with("...[truncated]"));
        assert!(truncated.trim_end_matches("...[truncated]").chars().all(|c| c == '€'));
    }
}
