//! usaspending client library
//!
//! An async client for the USAspending.gov bulk award download API.
//! Keep the crate root minimal — implementation and tests live in their modules.
//!
//! ## Overview
//!
//! The library is organized into modules that handle different stages of the
//! submit → poll → fetch pipeline:
//!
//! - [`filters`] - Builds the filter document scoping an export job
//! - [`client`] - Submits export requests, polls job status, drives the composed download
//! - [`archive`] - Unpacks the result archive and parses its CSV into a DataFrame
//! - [`models`] - Filter vocabulary and response records
//! - [`config`] - Client configuration (poll budget, delays, timeouts)
//! - [`trace`] - Caller-injected observability hook
//! - [`errors`] - Error types used throughout the crate
//!
//! ## Example Usage
//!
//! The typical workflow builds filters, submits them, and receives the award
//! records as a table once the server-side export job completes:
//!
//! ```no_run
//! use usaspending::{client::UsaSpending, filters::AwardFilters, errors::AppResult};
//!
//! # async fn example() -> AppResult<()> {
//! let client = UsaSpending::new();
//! let filters = AwardFilters::new()
//!     .with_start_date("2019-10-01")
//!     .with_end_date("2020-09-30")
//!     .with_prime_award_type("A");
//! let table = client.bulk_awards(&filters).await?;
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod client;
pub mod config;
pub mod constants;
pub mod errors;
pub mod filters;
pub mod models;
pub mod trace;

pub use client::UsaSpending;
pub use config::ClientConfig;
pub use errors::{AppError, AppResult};
pub use filters::AwardFilters;
pub use models::{Agency, AgencyTier, AgencyType, DateType, Location, StatusResponse, SubmitResponse};
pub use trace::OperationTracer;
