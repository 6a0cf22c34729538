use serde::{Deserialize, Serialize};

/// Which award date the filter date range applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateType {
    #[default]
    ActionDate,
    LastModifiedDate,
}

/// Whether an agency filter matches the funding or the awarding agency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgencyType {
    Funding,
    Awarding,
}

/// Agency hierarchy level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgencyTier {
    Toptier,
    Subtier,
}

/// A single agency filter entry.
///
/// All fields are optional on the wire; unset fields are omitted rather
/// than serialized as null. The remote service requires `toptier_name`
/// when `tier` is subtier — that rule is not enforced client-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Agency {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub agency_type: Option<AgencyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<AgencyTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toptier_name: Option<String>,
}

impl Agency {
    /// A toptier agency filter matching by name only.
    pub fn toptier(toptier_name: &str) -> Self {
        Self {
            toptier_name: Some(toptier_name.to_string()),
            ..Self::default()
        }
    }
}

/// A geographic filter entry. Any subset of the fields may be set;
/// unset fields are omitted from the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

/// Outcome of a bulk-download submission.
///
/// Non-success statuses are returned as values rather than raised, so the
/// caller can inspect the status code and the server's message. A 200
/// carries `file_name` (the export job identifier); a 400 carries
/// `message` and no `file_name`.
#[derive(Debug, Clone)]
pub struct SubmitResponse {
    pub status: u16,
    pub file_name: Option<String>,
    pub message: Option<String>,
    pub file_url: Option<String>,
}

impl SubmitResponse {
    /// True when the server accepted the request and assigned a job.
    pub fn is_accepted(&self) -> bool {
        self.status == 200 && self.file_name.is_some()
    }
}

/// Body of the submit endpoint response. Extra server fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SubmitBody {
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
}

/// One status-check record for an export job.
///
/// The set of status strings is open-ended on the server side; only
/// `"finished"` is treated as terminal by the composed operations.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub seconds_elapsed: Option<String>,
    #[serde(default)]
    pub total_rows: Option<i64>,
    #[serde(default)]
    pub total_columns: Option<i64>,
    #[serde(default)]
    pub total_size: Option<f64>,
}

impl StatusResponse {
    /// True when the job reached its terminal state.
    pub fn is_finished(&self) -> bool {
        self.status == crate::constants::STATUS_FINISHED
    }
}
