// Remote API
pub const BASE_URL: &str = "https://api.usaspending.gov";
pub const BULK_DOWNLOAD_PATH: &str = "/api/v2/bulk_download/awards/";
pub const DOWNLOAD_STATUS_PATH: &str = "/api/v2/download/status/";
pub const AWARDS_PATH: &str = "/api/v2/awards/";

// Job status value after which no further state change is expected.
pub const STATUS_FINISHED: &str = "finished";

// Placeholder agency used when building filters from parameters without
// any agency supplied, matching the remote API's documented examples.
pub const DEFAULT_TOPTIER_AGENCY: &str = "Department of Energy";

// Polling defaults
pub const DEFAULT_POLL_ATTEMPTS: u32 = 10;
pub const DEFAULT_POLL_DELAY_MS: u64 = 2000;

// Bulk archives can take a while to stream on slow links.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 600;
