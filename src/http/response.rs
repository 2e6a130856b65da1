//! Response envelopes.
//!
//! Every API route answers `200 OK` with a JSON body. Failures travel in an
//! `error` field, never in the status code; callers must inspect the body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::any::Any;

use crate::upstream::UpstreamResult;

/// Body layout for failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// `{"error": ...}`
    Plain,
    /// `{"error": ..., "results": []}` for listing routes.
    Listing,
}

/// A normalized upstream result on its way to the browser.
#[derive(Debug)]
pub struct Envelope {
    result: UpstreamResult<Value>,
    shape: Shape,
}

impl Envelope {
    pub fn plain(result: UpstreamResult<Value>) -> Self {
        Self {
            result,
            shape: Shape::Plain,
        }
    }

    pub fn listing(result: UpstreamResult<Value>) -> Self {
        Self {
            result,
            shape: Shape::Listing,
        }
    }

    /// The JSON body this envelope renders to.
    pub fn into_body(self) -> Value {
        match self.result {
            Ok(payload) => payload,
            Err(e) => error_body(&e.to_string(), self.shape),
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self.into_body())).into_response()
    }
}

fn error_body(message: &str, shape: Shape) -> Value {
    match shape {
        Shape::Plain => json!({ "error": message }),
        Shape::Listing => json!({ "error": message, "results": [] }),
    }
}

/// Convert a handler panic into the same 200 envelope as any other failure.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %detail, "Handler panicked");
    let message = format!("Unexpected Error: {}", detail);
    (StatusCode::OK, Json(error_body(&message, Shape::Plain))).into_response()
}
