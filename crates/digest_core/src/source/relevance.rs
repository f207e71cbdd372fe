use crate::config::Config;
use crate::error::AppError;
use crate::model::{TaskRecord, TranscriptEntry};
use crate::source::{TaskSource, TranscriptSource, decode_tasks, decode_transcript};
use reqwest::blocking::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
/// The list endpoint has no cursor; one page is asked to hold every row.
const TRANSCRIPT_PAGE_SIZE: u64 = 999_999_999_999;

/// Blocking client for the hosted agent API.
pub struct RelevanceClient {
    http: Client,
    base_url: String,
    authorization: String,
}

impl RelevanceClient {
    pub fn new(region: &str, project: &str, api_key: &str) -> Result<Self, AppError> {
        let base_url = format!("https://api-{}.stack.tryrelevance.com/latest", region.trim());
        Self::with_base_url(&base_url, project, api_key)
    }

    pub fn with_base_url(base_url: &str, project: &str, api_key: &str) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| AppError::upstream(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            authorization: format!("{}:{}", project.trim(), api_key.trim()),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(&config.region, &config.project, &config.api_key)
    }

    fn post(&self, path: &str, body: &Value) -> Result<Vec<Value>, AppError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "POST");
        let response = self
            .http
            .post(&url)
            .header("Authorization", &self.authorization)
            .json(body)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|err| AppError::upstream(format!("{path}: {err}")))?;
        let payload: Value = response
            .json()
            .map_err(|err| AppError::upstream(format!("{path}: invalid JSON body: {err}")))?;
        Ok(results_of(&payload))
    }
}

impl TaskSource for RelevanceClient {
    fn list_tasks(&self, agent_id: &str, max_results: usize) -> Result<Vec<TaskRecord>, AppError> {
        let rows = self.post(
            "agents/conversations/list",
            &tasks_request_body(agent_id, max_results),
        )?;
        let mut tasks = decode_tasks(&rows);
        tasks.truncate(max_results);
        Ok(tasks)
    }
}

impl TranscriptSource for RelevanceClient {
    fn fetch_transcript(&self, transcript_id: &str) -> Result<Vec<TranscriptEntry>, AppError> {
        let rows = self.post("knowledge/list", &transcript_request_body(transcript_id))?;
        if page_is_full(&rows, TRANSCRIPT_PAGE_SIZE) {
            warn!(
                transcript_id,
                rows = rows.len(),
                "transcript filled a whole page; action counts may be short"
            );
        }
        let data: Vec<Value> = rows
            .into_iter()
            .map(|row| row.get("data").cloned().unwrap_or(Value::Null))
            .collect();
        Ok(decode_transcript(&data))
    }
}

fn transcript_request_body(transcript_id: &str) -> Value {
    json!({
        "knowledge_set": transcript_id,
        "page_size": TRANSCRIPT_PAGE_SIZE,
    })
}

fn page_is_full(rows: &[Value], page_size: u64) -> bool {
    rows.len() as u64 >= page_size
}

fn tasks_request_body(agent_id: &str, max_results: usize) -> Value {
    json!({
        "filters": [
            {
                "field": "conversation.agent_id",
                "filter_type": "exact_match",
                "condition": "==",
                "condition_value": agent_id,
            },
            {
                "field": "conversation.is_debug_mode_task",
                "filter_type": "exact_match",
                "condition": "!=",
                "condition_value": true,
            }
        ],
        "include_hidden": true,
        "page_size": max_results,
        "sort": [{ "insert_date_": "desc" }],
    })
}

fn results_of(payload: &Value) -> Vec<Value> {
    payload
        .get("results")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}
