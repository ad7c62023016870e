//! Where plan state lives: a local JSON file or the dashboard server.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::config::Settings;
use crate::error::AppError;
use crate::io::StateBlob;

/// Actor recorded by a reset.
pub const RESET_ACTOR: &str = "system-reset";
/// Actor recorded when a save does not name one.
pub const FALLBACK_ACTOR: &str = "user";

/// Load/save/reset of the single plan state.
pub trait StateStore {
    /// Human-readable location, for logs.
    fn location(&self) -> String;

    fn load(&self) -> Result<StateBlob, AppError>;

    /// Persist `blob` and return the time the store recorded.
    fn save(&self, blob: &StateBlob) -> Result<DateTime<Utc>, AppError>;

    /// Restore the default state and return it.
    fn reset(&self) -> Result<StateBlob, AppError>;
}

/// Pick the store the settings point at.
pub fn open_store(settings: &Settings) -> Result<Box<dyn StateStore>, AppError> {
    match &settings.remote_url {
        Some(url) => Ok(Box::new(HttpStore::new(url)?)),
        None => Ok(Box::new(FileStore::new(&settings.state_file))),
    }
}

/// State kept in a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn write(&self, blob: &StateBlob) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::runtime(format!("Failed to create state directory '{}': {e}", parent.display()))
            })?;
        }
        let body = blob.to_json_pretty()?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body)
            .map_err(|e| AppError::runtime(format!("Failed to write state file '{}': {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            AppError::runtime(format!("Failed to replace state file '{}': {e}", self.path.display()))
        })
    }
}

impl StateStore for FileStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<StateBlob, AppError> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "no state file; using defaults");
            return Ok(StateBlob::default());
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            AppError::invalid_input(format!("Failed to read state file '{}': {e}", self.path.display()))
        })?;
        let blob = StateBlob::parse(&raw)
            .map_err(|e| AppError::invalid_input(format!("{} ({})", e.message(), self.path.display())))?;
        tracing::info!(path = %self.path.display(), "loaded state");
        Ok(blob)
    }

    fn save(&self, blob: &StateBlob) -> Result<DateTime<Utc>, AppError> {
        let now = Utc::now();
        let mut stamped = blob.clone();
        stamped.last_updated = Some(now);
        if stamped.updated_by.is_none() {
            stamped.updated_by = Some(FALLBACK_ACTOR.to_string());
        }
        self.write(&stamped)?;
        tracing::info!(path = %self.path.display(), at = %now.to_rfc3339(), "saved state");
        Ok(now)
    }

    fn reset(&self) -> Result<StateBlob, AppError> {
        let mut blob = StateBlob::defaults(RESET_ACTOR);
        blob.last_updated = Some(Utc::now());
        self.write(&blob)?;
        tracing::info!(path = %self.path.display(), "reset state to defaults");
        Ok(blob)
    }
}

/// Response envelope of the dashboard server.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    pub last_updated: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

/// Parse a server reply; `success: false` becomes a runtime error carrying the
/// server's message.
pub fn read_envelope<T: DeserializeOwned>(what: &str, body: &str) -> Result<Envelope<T>, AppError> {
    let envelope: Envelope<T> = serde_json::from_str(body)
        .map_err(|e| AppError::runtime(format!("Unexpected reply to {what}: {e}")))?;
    if !envelope.success {
        let reason = envelope
            .error
            .as_deref()
            .or(envelope.message.as_deref())
            .unwrap_or("no reason given");
        return Err(AppError::runtime(format!("Server rejected {what}: {reason}")));
    }
    Ok(envelope)
}

/// State held by the dashboard server (`/api/state`, `/api/reset`).
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;
        Self::with_client(base_url, client)
    }

    pub fn with_client(base_url: &str, client: Client) -> Result<Self, AppError> {
        Ok(Self {
            client,
            base_url: crate::config::parse_remote_url(base_url)?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn read_body(what: &str, resp: reqwest::blocking::Response) -> Result<String, AppError> {
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| AppError::runtime(format!("Failed to read reply to {what}: {e}")))?;
        // Error replies still carry the envelope; prefer its message.
        if !status.is_success() && serde_json::from_str::<serde_json::Value>(&body).is_err() {
            return Err(AppError::runtime(format!("{what} failed with status {status}.")));
        }
        Ok(body)
    }
}

impl StateStore for HttpStore {
    fn location(&self) -> String {
        self.base_url.clone()
    }

    fn load(&self) -> Result<StateBlob, AppError> {
        let what = "GET /api/state";
        let resp = self
            .client
            .get(self.url("/api/state"))
            .send()
            .map_err(|e| AppError::runtime(format!("{what} failed: {e}")))?;
        let body = Self::read_body(what, resp)?;
        let envelope: Envelope<StateBlob> = read_envelope(what, &body)?;
        tracing::info!(url = %self.base_url, "loaded state");
        Ok(envelope.data.unwrap_or_default())
    }

    fn save(&self, blob: &StateBlob) -> Result<DateTime<Utc>, AppError> {
        let what = "POST /api/state";
        let resp = self
            .client
            .post(self.url("/api/state"))
            .json(blob)
            .send()
            .map_err(|e| AppError::runtime(format!("{what} failed: {e}")))?;
        let body = Self::read_body(what, resp)?;
        let envelope: Envelope<serde_json::Value> = read_envelope(what, &body)?;
        let at = envelope
            .last_updated
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);
        tracing::info!(url = %self.base_url, at = %at.to_rfc3339(), "saved state");
        Ok(at)
    }

    fn reset(&self) -> Result<StateBlob, AppError> {
        let what = "POST /api/reset";
        let resp = self
            .client
            .post(self.url("/api/reset"))
            .send()
            .map_err(|e| AppError::runtime(format!("{what} failed: {e}")))?;
        let body = Self::read_body(what, resp)?;
        read_envelope::<serde_json::Value>(what, &body)?;
        tracing::info!(url = %self.base_url, "reset state to defaults");
        self.load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    #[test]
    fn missing_file_loads_default_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("absent.json"));
        let blob = store.load().unwrap();
        assert_eq!(blob, StateBlob::default());
        assert_eq!(blob.into_plan().brands.len(), 17);
    }

    #[test]
    fn save_then_load_round_trips_with_stamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested/state.json"));
        let mut blob = StateBlob::defaults("tester");
        blob.updated_by = None;

        let at = store.save(&blob).unwrap();
        let back = store.load().unwrap();
        assert_eq!(back.last_updated, Some(at));
        assert_eq!(back.updated_by.as_deref(), Some(FALLBACK_ACTOR));
        let plan = back.into_plan();
        assert_eq!(plan.brands_in(Category::Discover).count(), 11);
        assert_eq!(plan.brands, blob.into_plan().brands);
    }

    #[test]
    fn reset_overwrites_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{ "syndConfigs": {} , "discConfigs": {} }"#).unwrap();
        let store = FileStore::new(&path);
        assert!(store.load().unwrap().into_plan().brands.is_empty());

        let blob = store.reset().unwrap();
        assert_eq!(blob.updated_by.as_deref(), Some(RESET_ACTOR));
        assert_eq!(store.load().unwrap().into_plan().brands.len(), 17);
    }

    #[test]
    fn corrupt_file_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ oops").unwrap();
        let err = FileStore::new(&path).load().unwrap_err();
        assert_eq!(err.exit_code(), AppError::INVALID_INPUT);
        assert!(err.message().contains("state.json"));
    }

    #[test]
    fn envelope_success_and_failure() {
        let ok: Envelope<serde_json::Value> = read_envelope(
            "POST /api/state",
            r#"{"success":true,"message":"State saved","lastUpdated":"2026-03-01T10:00:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(ok.last_updated.as_deref(), Some("2026-03-01T10:00:00.000Z"));

        let err = read_envelope::<StateBlob>("GET /api/state", r#"{"success":false,"error":"disk full"}"#)
            .unwrap_err();
        assert_eq!(err.exit_code(), AppError::RUNTIME);
        assert!(err.message().contains("disk full"));
    }

    #[test]
    fn envelope_with_null_sections_projects_defaults() {
        let body = r#"{"success":true,"data":{"overhead":{"salary":47000,"tech":4855,"admin":12800},
            "rpmSeasonality":null,"baselineData":null,"syndConfigs":null,"hiringPlans":null,
            "discConfigs":null,"lastUpdated":"2026-03-01T10:00:00.000Z","updatedBy":"system"}}"#;
        let env: Envelope<StateBlob> = read_envelope("GET /api/state", body).unwrap();
        let plan = env.data.unwrap().into_plan();
        assert_eq!(plan.brands.len(), 17);
    }

    #[test]
    fn store_selection_follows_settings() {
        let mut settings = Settings::default();
        assert_eq!(open_store(&settings).unwrap().location(), "data/aop_state.json");
        settings.remote_url = Some("http://localhost:3001".to_string());
        assert_eq!(open_store(&settings).unwrap().location(), "http://localhost:3001");
    }

    /// One canned reply per connection; returns what each request sent.
    fn serve(replies: Vec<(u16, &'static str)>) -> (String, std::thread::JoinHandle<Vec<(String, String)>>) {
        use std::io::{BufRead, BufReader, Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = std::thread::spawn(move || {
            let mut seen = Vec::new();
            for (status, body) in replies {
                let (stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream);
                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                let mut length = 0;
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).unwrap();
                    if line.trim().is_empty() {
                        break;
                    }
                    if let Some((name, value)) = line.split_once(':') {
                        if name.eq_ignore_ascii_case("content-length") {
                            length = value.trim().parse().unwrap();
                        }
                    }
                }
                let mut payload = vec![0; length];
                reader.read_exact(&mut payload).unwrap();
                seen.push((request_line.trim_end().to_string(), String::from_utf8(payload).unwrap()));

                let mut stream = reader.into_inner();
                write!(
                    stream,
                    "HTTP/1.1 {status} Reply\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                )
                .unwrap();
            }
            seen
        });
        (url, handle)
    }

    fn local_store(url: &str) -> HttpStore {
        let client = Client::builder().no_proxy().build().unwrap();
        HttpStore::with_client(url, client).unwrap()
    }

    const STATE_REPLY: &str = r#"{"success":true,"data":{"syndConfigs":{},"hiringPlans":{},
        "discConfigs":{"Remote":{"baseTraffic":1000,"baseRpm":2}},"updatedBy":"system"}}"#;

    #[test]
    fn http_load_reads_the_state_envelope() {
        let (url, server) = serve(vec![(200, STATE_REPLY)]);
        let blob = local_store(&url).load().unwrap();
        let plan = blob.into_plan();
        assert_eq!(plan.brands.len(), 1);
        assert_eq!(plan.brands[0].name, "Remote");
        assert_eq!(plan.updated_by.as_deref(), Some("system"));

        let seen = server.join().unwrap();
        assert_eq!(seen[0].0, "GET /api/state HTTP/1.1");
    }

    #[test]
    fn http_save_posts_the_blob_and_returns_server_stamp() {
        let (url, server) = serve(vec![(
            200,
            r#"{"success":true,"message":"State saved","lastUpdated":"2026-03-01T10:00:00.000Z"}"#,
        )]);
        let mut blob = StateBlob::defaults("tester");
        blob.last_updated = None;
        let at = local_store(&url).save(&blob).unwrap();
        assert_eq!(at.to_rfc3339(), "2026-03-01T10:00:00+00:00");

        let seen = server.join().unwrap();
        assert_eq!(seen[0].0, "POST /api/state HTTP/1.1");
        let sent = StateBlob::parse(&seen[0].1).unwrap();
        assert_eq!(sent.updated_by.as_deref(), Some("tester"));
        assert_eq!(sent.into_plan().brands.len(), 17);
    }

    #[test]
    fn http_reset_posts_then_reloads() {
        let (url, server) = serve(vec![
            (200, r#"{"success":true,"message":"State reset"}"#),
            (200, STATE_REPLY),
        ]);
        let blob = local_store(&url).reset().unwrap();
        assert_eq!(blob.into_plan().brands[0].name, "Remote");

        let seen = server.join().unwrap();
        let lines: Vec<&str> = seen.iter().map(|(line, _)| line.as_str()).collect();
        assert_eq!(lines, ["POST /api/reset HTTP/1.1", "GET /api/state HTTP/1.1"]);
    }

    #[test]
    fn http_failures_are_runtime_errors() {
        let (url, server) = serve(vec![
            (500, "upstream exploded"),
            (500, r#"{"success":false,"error":"disk full"}"#),
        ]);
        let store = local_store(&url);

        let err = store.load().unwrap_err();
        assert_eq!(err.exit_code(), AppError::RUNTIME);
        assert!(err.message().contains("500"));

        let err = store.save(&StateBlob::default()).unwrap_err();
        assert_eq!(err.exit_code(), AppError::RUNTIME);
        assert!(err.message().contains("disk full"));

        server.join().unwrap();
    }
}
