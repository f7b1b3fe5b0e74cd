use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Utc;
use serde::Serialize;

use crate::{domain::RequestContext, errors::Error, Result};

const AUDIT_MAX_TEXT: usize = 500;

/// RFC3339 timestamp in UTC.
pub fn iso_timestamp_utc() -> String {
    Utc::now().to_rfc3339()
}

#[derive(Clone, Debug, Serialize)]
pub struct AuditEvent {
    pub timestamp: String,
    pub event: String,

    pub chat_id: i64,
    pub user_id: i64,
    pub username: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl AuditEvent {
    fn base(event: &str, ctx: &RequestContext) -> Self {
        Self {
            timestamp: iso_timestamp_utc(),
            event: event.to_string(),
            chat_id: ctx.chat_id.0,
            user_id: ctx.user_id.0,
            username: ctx.username.clone(),
            input: None,
            outcome: None,
            error: None,
            context: None,
        }
    }

    /// A key submission and how it was classified (`redeemed`, `rejected`, `invalid`).
    pub fn redemption(ctx: &RequestContext, input: &str, outcome: &str) -> Self {
        Self {
            input: Some(input.to_string()),
            outcome: Some(outcome.to_string()),
            ..Self::base("redemption", ctx)
        }
    }

    /// A track selection (`sent`, `not_found`).
    pub fn delivery(ctx: &RequestContext, token: &str, outcome: &str) -> Self {
        Self {
            input: Some(token.to_string()),
            outcome: Some(outcome.to_string()),
            ..Self::base("delivery", ctx)
        }
    }

    pub fn error(ctx: &RequestContext, operation: &str, input: &str, error: &str) -> Self {
        Self {
            input: Some(input.to_string()),
            error: Some(error.to_string()),
            context: Some(operation.to_string()),
            ..Self::base("error", ctx)
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuditLogger {
    path: PathBuf,
    json: bool,
}

impl AuditLogger {
    pub fn new(path: impl Into<PathBuf>, json: bool) -> Self {
        Self {
            path: path.into(),
            json,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, mut event: AuditEvent) -> Result<()> {
        if let Some(s) = &event.input {
            event.input = Some(truncate_text(s, AUDIT_MAX_TEXT));
        }
        if let Some(s) = &event.error {
            event.error = Some(truncate_text(s, AUDIT_MAX_TEXT));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if self.json {
            let line = serde_json::to_string(&event)?;
            writeln!(file, "{line}")?;
            return Ok(());
        }

        // Plain text format for readability.
        let mut out = String::new();
        out.push('\n');
        out.push_str(&"=".repeat(60));

        let value = serde_json::to_value(&event)?;
        let Some(obj) = value.as_object() else {
            return Err(Error::External(
                "audit event is not a JSON object".to_string(),
            ));
        };
        for (k, v) in obj {
            out.push('\n');
            out.push_str(k);
            out.push_str(": ");
            out.push_str(&json_value_to_display(v));
        }
        out.push('\n');

        file.write_all(out.as_bytes())?;
        Ok(())
    }

    /// Write an event on the blocking pool, logging instead of failing.
    pub async fn record(&self, event: AuditEvent) {
        let logger = self.clone();
        let res = tokio::task::spawn_blocking(move || logger.write(event))
            .await
            .map_err(|e| Error::External(format!("audit task failed: {e}")))
            .and_then(|r| r);
        if let Err(e) = res {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to write audit event");
        }
    }
}

pub fn truncate_text(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let mut out = s.chars().take(max_len).collect::<String>();
    out.push_str("...");
    out
}

fn json_value_to_display(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::String(s) => s.to_string(),
        other => other.to_string(),
    }
}
