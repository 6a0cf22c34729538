use crate::constants::DEFAULT_TOPTIER_AGENCY;
use crate::errors::{AppError, AppResult};
use crate::models::{Agency, DateType, Location};
use chrono::NaiveDate;
use serde_json::{json, Map, Value};

/// Date input formats accepted by the builder, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%m-%d-%Y", "%Y%m%d"];

/// Builder for the filter document submitted to the bulk-download endpoint.
///
/// Parameters left unset are omitted from the produced document entirely;
/// the server treats absent and empty keys differently, so nothing is ever
/// serialized as an empty list or null. Award-type codes are forwarded
/// verbatim — membership in the server's accepted enumerations is the
/// server's problem, not this builder's.
///
/// A caller-supplied explicit document (see [`AwardFilters::with_document`])
/// takes precedence over every other parameter: when one is present it is
/// submitted verbatim and no individual parameter is inspected. This is
/// documented precedence, not a merge.
///
/// # Example
///
/// ```
/// use usaspending::filters::AwardFilters;
///
/// # fn main() -> Result<(), usaspending::errors::AppError> {
/// let document = AwardFilters::new()
///     .with_start_date("2019-10-01")
///     .with_end_date("2020-09-30")
///     .with_prime_award_type("A")
///     .to_document()?;
/// assert_eq!(document["prime_award_types"][0], "A");
/// assert_eq!(document["date_range"]["start_date"], "2019-10-01");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AwardFilters {
    start_date: Option<String>,
    end_date: Option<String>,
    date_type: DateType,
    agencies: Vec<Agency>,
    prime_award_types: Vec<String>,
    sub_award_types: Vec<String>,
    place_of_performance_locations: Vec<Location>,
    place_of_performance_scope: Option<String>,
    recipient_locations: Vec<Location>,
    recipient_scope: Option<String>,
    document: Option<Value>,
}

impl AwardFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start of the filtered time period. Accepts common date formats;
    /// normalized to `YYYY-MM-DD` when the document is built.
    pub fn with_start_date(mut self, start_date: &str) -> Self {
        self.start_date = Some(start_date.to_string());
        self
    }

    /// End of the filtered time period. Accepts common date formats;
    /// normalized to `YYYY-MM-DD` when the document is built.
    pub fn with_end_date(mut self, end_date: &str) -> Self {
        self.end_date = Some(end_date.to_string());
        self
    }

    /// Which award date the range applies to. Defaults to `action_date`.
    pub fn with_date_type(mut self, date_type: DateType) -> Self {
        self.date_type = date_type;
        self
    }

    pub fn with_agency(mut self, agency: Agency) -> Self {
        self.agencies.push(agency);
        self
    }

    pub fn with_agencies(mut self, agencies: &[Agency]) -> Self {
        self.agencies.extend_from_slice(agencies);
        self
    }

    pub fn with_prime_award_type(mut self, code: &str) -> Self {
        self.prime_award_types.push(code.to_string());
        self
    }

    pub fn with_prime_award_types(mut self, codes: &[String]) -> Self {
        self.prime_award_types.extend_from_slice(codes);
        self
    }

    pub fn with_sub_award_type(mut self, code: &str) -> Self {
        self.sub_award_types.push(code.to_string());
        self
    }

    pub fn with_sub_award_types(mut self, codes: &[String]) -> Self {
        self.sub_award_types.extend_from_slice(codes);
        self
    }

    pub fn with_place_of_performance_location(mut self, location: Location) -> Self {
        self.place_of_performance_locations.push(location);
        self
    }

    pub fn with_place_of_performance_scope(mut self, scope: &str) -> Self {
        self.place_of_performance_scope = Some(scope.to_string());
        self
    }

    pub fn with_recipient_location(mut self, location: Location) -> Self {
        self.recipient_locations.push(location);
        self
    }

    pub fn with_recipient_scope(mut self, scope: &str) -> Self {
        self.recipient_scope = Some(scope.to_string());
        self
    }

    /// Supplies a pre-built filter document to submit verbatim.
    ///
    /// When set, every other parameter on this builder is ignored, even if
    /// explicitly populated.
    pub fn with_document(mut self, document: Value) -> Self {
        self.document = Some(document);
        self
    }

    /// Produces the filter document to submit.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when a supplied date cannot be parsed in any
    /// accepted format.
    pub fn to_document(&self) -> AppResult<Value> {
        if let Some(document) = &self.document {
            return Ok(document.clone());
        }

        let mut filters = Map::new();

        filters.insert("date_type".to_string(), serde_json::to_value(self.date_type)?);

        if self.start_date.is_some() || self.end_date.is_some() {
            let mut date_range = Map::new();
            if let Some(start) = &self.start_date {
                date_range.insert("start_date".to_string(), json!(normalize_date(start)?));
            }
            if let Some(end) = &self.end_date {
                date_range.insert("end_date".to_string(), json!(normalize_date(end)?));
            }
            filters.insert("date_range".to_string(), Value::Object(date_range));
        }

        // The placeholder agency keeps parameter-built documents accepted by
        // the server when the caller scopes only by dates and award types.
        let default_agency;
        let agencies: &[Agency] = if self.agencies.is_empty() {
            default_agency = [Agency::toptier(DEFAULT_TOPTIER_AGENCY)];
            &default_agency
        } else {
            &self.agencies
        };
        filters.insert("agencies".to_string(), serde_json::to_value(agencies)?);

        if !self.prime_award_types.is_empty() {
            filters.insert(
                "prime_award_types".to_string(),
                json!(self.prime_award_types),
            );
        }
        if !self.sub_award_types.is_empty() {
            filters.insert("sub_award_types".to_string(), json!(self.sub_award_types));
        }
        if !self.place_of_performance_locations.is_empty() {
            filters.insert(
                "place_of_performance_locations".to_string(),
                serde_json::to_value(&self.place_of_performance_locations)?,
            );
        }
        if let Some(scope) = &self.place_of_performance_scope {
            filters.insert("place_of_performance_scope".to_string(), json!(scope));
        }
        if !self.recipient_locations.is_empty() {
            filters.insert(
                "recipient_locations".to_string(),
                serde_json::to_value(&self.recipient_locations)?,
            );
        }
        if let Some(scope) = &self.recipient_scope {
            filters.insert("recipient_scope".to_string(), json!(scope));
        }

        Ok(Value::Object(filters))
    }
}

/// Normalizes a date string to `YYYY-MM-DD`, trying each accepted input
/// format in order.
pub fn normalize_date(input: &str) -> AppResult<String> {
    let trimmed = input.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date.format("%Y-%m-%d").to_string());
        }
    }
    Err(AppError::InvalidInput(format!(
        "Unrecognized date format: {input}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgencyTier, AgencyType};

    #[test]
    fn test_normalize_date_accepts_common_formats() {
        assert_eq!(normalize_date("2019-10-01").unwrap(), "2019-10-01");
        assert_eq!(normalize_date("2019/10/01").unwrap(), "2019-10-01");
        assert_eq!(normalize_date("10/01/2019").unwrap(), "2019-10-01");
        assert_eq!(normalize_date("10-01-2019").unwrap(), "2019-10-01");
        assert_eq!(normalize_date("20191001").unwrap(), "2019-10-01");
        assert_eq!(normalize_date(" 2019-10-01 ").unwrap(), "2019-10-01");
    }

    #[test]
    fn test_normalize_date_rejects_garbage() {
        let result = normalize_date("next Tuesday");
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_default_document_has_date_type_and_placeholder_agency() {
        let document = AwardFilters::new().to_document().unwrap();
        assert_eq!(document["date_type"], "action_date");
        assert_eq!(
            document["agencies"],
            serde_json::json!([{"toptier_name": "Department of Energy"}])
        );
        // Unset parameters are omitted, not serialized empty.
        assert!(document.get("prime_award_types").is_none());
        assert!(document.get("sub_award_types").is_none());
        assert!(document.get("date_range").is_none());
        assert!(document.get("recipient_scope").is_none());
    }

    #[test]
    fn test_dates_fold_into_nested_date_range() {
        let document = AwardFilters::new()
            .with_start_date("10/01/2019")
            .with_end_date("2020-09-30")
            .to_document()
            .unwrap();
        assert_eq!(
            document["date_range"],
            serde_json::json!({"start_date": "2019-10-01", "end_date": "2020-09-30"})
        );
        assert!(document.get("start_date").is_none());
        assert!(document.get("end_date").is_none());
    }

    #[test]
    fn test_single_date_bound_is_kept_without_the_other() {
        let document = AwardFilters::new()
            .with_start_date("2019-10-01")
            .to_document()
            .unwrap();
        assert_eq!(document["date_range"]["start_date"], "2019-10-01");
        assert!(document["date_range"].get("end_date").is_none());
    }

    #[test]
    fn test_invalid_date_surfaces_when_building() {
        let result = AwardFilters::new()
            .with_start_date("not-a-date")
            .to_document();
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_explicit_agencies_replace_placeholder() {
        let document = AwardFilters::new()
            .with_agency(Agency {
                agency_type: Some(AgencyType::Awarding),
                tier: Some(AgencyTier::Toptier),
                name: Some("Department of Defense".to_string()),
                toptier_name: None,
            })
            .to_document()
            .unwrap();
        assert_eq!(document["agencies"][0]["name"], "Department of Defense");
        assert_eq!(document["agencies"][0]["type"], "awarding");
        assert_eq!(document["agencies"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_award_type_codes_forwarded_without_validation() {
        let document = AwardFilters::new()
            .with_prime_award_type("A")
            .with_prime_award_type("definitely-not-a-real-code")
            .to_document()
            .unwrap();
        assert_eq!(
            document["prime_award_types"],
            serde_json::json!(["A", "definitely-not-a-real-code"])
        );
    }

    #[test]
    fn test_explicit_document_wins_over_all_parameters() {
        let explicit = serde_json::json!({"prime_award_types": ["B"]});
        let document = AwardFilters::new()
            .with_start_date("2019-10-01")
            .with_prime_award_type("A")
            .with_recipient_scope("domestic")
            .with_document(explicit.clone())
            .to_document()
            .unwrap();
        // Verbatim, never merged.
        assert_eq!(document, explicit);
    }

    #[test]
    fn test_parameters_and_equivalent_document_match() {
        let built = AwardFilters::new()
            .with_start_date("2019-10-01")
            .with_end_date("2020-09-30")
            .with_prime_award_type("A")
            .to_document()
            .unwrap();
        let explicit = serde_json::json!({
            "date_type": "action_date",
            "date_range": {"start_date": "2019-10-01", "end_date": "2020-09-30"},
            "agencies": [{"toptier_name": "Department of Energy"}],
            "prime_award_types": ["A"],
        });
        assert_eq!(built, explicit);
    }

    #[test]
    fn test_locations_and_scopes_serialize_under_own_keys() {
        let document = AwardFilters::new()
            .with_place_of_performance_location(Location {
                country: Some("USA".to_string()),
                state: Some("NM".to_string()),
                ..Location::default()
            })
            .with_place_of_performance_scope("domestic")
            .with_recipient_location(Location {
                country: Some("USA".to_string()),
                ..Location::default()
            })
            .with_recipient_scope("domestic")
            .to_document()
            .unwrap();
        assert_eq!(
            document["place_of_performance_locations"],
            serde_json::json!([{"country": "USA", "state": "NM"}])
        );
        assert_eq!(document["place_of_performance_scope"], "domestic");
        assert_eq!(
            document["recipient_locations"],
            serde_json::json!([{"country": "USA"}])
        );
        assert_eq!(document["recipient_scope"], "domestic");
    }
}
