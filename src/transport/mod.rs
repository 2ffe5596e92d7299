//! Transport layer: wire-format details for the gateway dispatch call.

use serde::{Deserialize, Serialize};

use crate::domain::Message;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DispatchStatus {
    Ok,
    Error,
}

/// Gateway dispatch request: the serialized message plus transport-level
/// metadata. Subject and schedule date travel next to the message object,
/// never inside it.
#[derive(Debug, Serialize)]
struct DispatchJsonRequest<'a> {
    message: &'a Message,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<&'a str>,
    #[serde(rename = "scheduleDate", skip_serializing_if = "Option::is_none")]
    schedule_date: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
struct DispatchJsonResponse {
    status: DispatchStatus,
    #[serde(default, rename = "statusText")]
    status_text: Option<String>,
    #[serde(default, rename = "messageId")]
    message_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub status: DispatchStatus,
    pub status_text: Option<String>,
    pub message_id: Option<String>,
}

/// Encode the dispatch request body.
///
/// `schedule_date` is emitted only when the schedule flag is set; an
/// unscheduled message never carries a date, whatever the builder stored.
pub fn encode_dispatch_request(
    message: &Message,
    subject: Option<&str>,
    schedule_date: Option<&str>,
    is_schedule: bool,
) -> Result<serde_json::Value, serde_json::Error> {
    let schedule_date = if is_schedule { schedule_date } else { None };
    serde_json::to_value(DispatchJsonRequest {
        message,
        subject,
        schedule_date,
    })
}

pub fn decode_dispatch_json_response(body: &str) -> Result<DispatchOutcome, TransportError> {
    let parsed: DispatchJsonResponse = serde_json::from_str(body)?;
    Ok(DispatchOutcome {
        status: parsed.status,
        status_text: parsed.status_text,
        message_id: parsed.message_id,
    })
}
