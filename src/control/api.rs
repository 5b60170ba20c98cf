//! Control API response types
//!
//! This module is the error translation boundary. Adapter results become
//! either a typed value, an [`ActionOutcome`] for transport actions, or an
//! [`ApiError`] carrying the original failure message. No adapter error type
//! leaves this layer.

use crate::actions::Action;
use crate::player::AdapterError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// Outcome status of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// The player applied the action
    Ok,
    /// The action was rejected or failed
    Error,
}

/// Uniform result of a transport action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// `ok` or `error`
    pub outcome: OutcomeStatus,

    /// Empty on success, otherwise the failure text
    pub message: String,
}

impl ActionOutcome {
    /// Successful outcome
    pub fn ok() -> Self {
        Self {
            outcome: OutcomeStatus::Ok,
            message: String::new(),
        }
    }

    /// Failed outcome with a message
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            outcome: OutcomeStatus::Error,
            message: message.into(),
        }
    }

    /// Translate the adapter result of `action`
    pub fn from_result(action: Action, result: Result<bool, AdapterError>) -> Self {
        match result {
            Ok(true) => Self::ok(),
            Ok(false) => Self::error(format!("player did not accept '{}'", action)),
            Err(e) => Self::error(e.to_string()),
        }
    }

    /// Whether the action succeeded
    pub fn is_ok(&self) -> bool {
        self.outcome == OutcomeStatus::Ok
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, ApiError> {
        serde_json::to_string(self).map_err(|e| ApiError::SerializationError(e.to_string()))
    }
}

impl IntoResponse for ActionOutcome {
    fn into_response(self) -> Response {
        let status = if self.is_ok() {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(self)).into_response()
    }
}

/// Body of the version endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionResponse {
    /// Player version
    pub version: String,
}

/// Body of the action listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionList {
    /// Registered action names
    pub actions: Vec<String>,
}

/// Query failure
///
/// Serialized in the same `{outcome, message}` shape as [`ActionOutcome`],
/// with the failure category added under `type`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The player could not be reached
    #[error("Player unavailable: {0}")]
    PlayerUnavailable(String),

    /// The request named a metadata field the player does not know
    #[error("Unsupported field: {0}")]
    UnsupportedField(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to serialize response
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::PlayerUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::UnsupportedField(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::SerializationError(_) | Self::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Failure category reported under `type`
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlayerUnavailable(_) => "PlayerUnavailable",
            Self::UnsupportedField(_) => "UnsupportedField",
            Self::NotFound(_) => "NotFound",
            Self::SerializationError(_) => "SerializationError",
            Self::InternalError(_) => "InternalError",
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, ApiError> {
        serde_json::to_string(self).map_err(|e| ApiError::SerializationError(e.to_string()))
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    outcome: OutcomeStatus,
    #[serde(rename = "type")]
    kind: &'static str,
    message: &'a str,
}

impl Serialize for ApiError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let message = self.to_string();
        ErrorBody {
            outcome: OutcomeStatus::Error,
            kind: self.kind(),
            message: &message,
        }
        .serialize(serializer)
    }
}

impl From<AdapterError> for ApiError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::Unavailable(msg) => ApiError::PlayerUnavailable(msg),
            AdapterError::FieldUnsupported(field) => ApiError::UnsupportedField(field),
            AdapterError::Io(e) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
