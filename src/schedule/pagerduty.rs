//! PagerDuty REST API v2 schedule source.

use chrono::SecondsFormat;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{ClaimError, ClaimResult};
use crate::models::AssignmentRecord;

use super::{ScheduleQuery, ScheduleSource};

/// Base URL of the PagerDuty REST API.
pub const DEFAULT_PAGERDUTY_URL: &str = "https://api.pagerduty.com";

const PAGERDUTY_ACCEPT: &str = "application/vnd.pagerduty+json;version=2";

/// Response of `GET /schedules`.
#[derive(Debug, Deserialize)]
struct ScheduleList {
    #[serde(default)]
    schedules: Vec<ScheduleSummary>,
}

#[derive(Debug, Deserialize)]
struct ScheduleSummary {
    id: String,
}

/// Response of `GET /schedules/{id}`.
#[derive(Debug, Deserialize)]
struct ScheduleEnvelope {
    schedule: ScheduleDetail,
}

#[derive(Debug, Deserialize)]
struct ScheduleDetail {
    final_schedule: FinalSchedule,
}

#[derive(Debug, Deserialize)]
struct FinalSchedule {
    #[serde(default)]
    rendered_schedule_entries: Vec<RenderedEntry>,
}

#[derive(Debug, Deserialize)]
struct RenderedEntry {
    start: String,
    end: String,
    user: UserReference,
}

#[derive(Debug, Deserialize)]
struct UserReference {
    #[serde(default)]
    summary: String,
}

impl From<RenderedEntry> for AssignmentRecord {
    fn from(entry: RenderedEntry) -> Self {
        AssignmentRecord {
            assignee: entry.user.summary,
            start: entry.start,
            end: entry.end,
        }
    }
}

/// Client for the PagerDuty schedules API.
///
/// Looks the schedule up by name, takes the first match, and returns the
/// entries of its final (override-applied) layer.
#[derive(Debug, Clone)]
pub struct PagerDutyClient {
    client: Client,
    base_url: String,
}

impl Default for PagerDutyClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PagerDutyClient {
    /// Creates a client for the public PagerDuty API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_PAGERDUTY_URL)
    }

    /// Creates a client for another API root, e.g. a mock server.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        api_token: &str,
    ) -> ClaimResult<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "PagerDuty request");

        let source_error = |e: reqwest::Error| ClaimError::ScheduleSource {
            message: e.to_string(),
        };

        self.client
            .get(&url)
            .query(params)
            .header(AUTHORIZATION, format!("Token token={}", api_token))
            .header(ACCEPT, PAGERDUTY_ACCEPT)
            .send()
            .map_err(source_error)?
            .error_for_status()
            .map_err(source_error)?
            .json::<T>()
            .map_err(source_error)
    }

    fn find_schedule_id(&self, query: &ScheduleQuery) -> ClaimResult<String> {
        let list: ScheduleList = self.get_json(
            "/schedules",
            &[("query", query.schedule_name.as_str())],
            &query.api_token,
        )?;

        list.schedules
            .into_iter()
            .next()
            .map(|schedule| schedule.id)
            .ok_or_else(|| ClaimError::ScheduleNotFound {
                query: query.schedule_name.clone(),
            })
    }
}

impl ScheduleSource for PagerDutyClient {
    fn fetch_assignments(&self, query: &ScheduleQuery) -> ClaimResult<Vec<AssignmentRecord>> {
        let schedule_id = self.find_schedule_id(query)?;
        let since = query.since.to_rfc3339_opts(SecondsFormat::Secs, true);
        let until = query.until.to_rfc3339_opts(SecondsFormat::Secs, true);

        let envelope: ScheduleEnvelope = self.get_json(
            &format!("/schedules/{}", schedule_id),
            &[("since", since.as_str()), ("until", until.as_str())],
            &query.api_token,
        )?;

        let records = records_from_schedule(envelope.schedule);
        info!(
            schedule_id = %schedule_id,
            entries = records.len(),
            "Fetched schedule entries"
        );
        Ok(records)
    }
}

fn records_from_schedule(schedule: ScheduleDetail) -> Vec<AssignmentRecord> {
    schedule
        .final_schedule
        .rendered_schedule_entries
        .into_iter()
        .map(AssignmentRecord::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_response_maps_to_records() {
        let json = r#"{
            "schedule": {
                "id": "PABC123",
                "name": "Orion",
                "final_schedule": {
                    "name": "Final Schedule",
                    "rendered_schedule_entries": [
                        {
                            "start": "2024-01-01T00:00:00+08:00",
                            "end": "2024-01-08T00:00:00+08:00",
                            "user": { "id": "PU1", "type": "user_reference", "summary": "Alice" }
                        },
                        {
                            "start": "2024-01-08T00:00:00+08:00",
                            "end": "2024-01-15T00:00:00+08:00",
                            "user": { "id": "PU2", "type": "user_reference", "summary": "Bob" }
                        }
                    ]
                }
            }
        }"#;

        let envelope: ScheduleEnvelope = serde_json::from_str(json).unwrap();
        let records = records_from_schedule(envelope.schedule);

        assert_eq!(
            records,
            vec![
                AssignmentRecord::new("Alice", "2024-01-01T00:00:00+08:00", "2024-01-08T00:00:00+08:00"),
                AssignmentRecord::new("Bob", "2024-01-08T00:00:00+08:00", "2024-01-15T00:00:00+08:00"),
            ]
        );
    }

    #[test]
    fn test_empty_final_schedule() {
        let json = r#"{ "schedule": { "final_schedule": {} } }"#;
        let envelope: ScheduleEnvelope = serde_json::from_str(json).unwrap();
        assert!(records_from_schedule(envelope.schedule).is_empty());
    }

    #[test]
    fn test_schedule_list_takes_ids() {
        let json = r#"{ "schedules": [ { "id": "P1", "name": "Orion" }, { "id": "P2" } ], "more": false }"#;
        let list: ScheduleList = serde_json::from_str(json).unwrap();
        let ids: Vec<String> = list.schedules.into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec!["P1", "P2"]);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = PagerDutyClient::with_base_url("http://localhost:8080/");
        assert_eq!(client.base_url, "http://localhost:8080");
    }
}
