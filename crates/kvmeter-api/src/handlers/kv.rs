use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use http::StatusCode;
use kvmeter_common::error::KvmeterError;
use serde::Serialize;
use tracing::{info, warn};

use crate::{error::ApiError, router::ApiState};

type ApiResult = Result<Response, ApiError>;

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ValueResponse {
    value: String,
}

pub async fn set_value(
    State(state): State<Arc<ApiState>>,
    Path((key, value)): Path<(String, String)>,
) -> ApiResult {
    let key = state.prefixed_key(&key);
    if let Err(err) = state
        .store
        .set(Bytes::from(key.clone()), Bytes::from(value.clone()))
        .await
    {
        warn!(error = %err, %key, "failed to set key-value pair");
        return Err(err.into());
    }

    info!(%key, %value, "key-value pair set");
    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Key-value pair set successfully",
        }),
    )
        .into_response())
}

pub async fn get_value(
    State(state): State<Arc<ApiState>>,
    Path(key): Path<String>,
) -> ApiResult {
    let key = state.prefixed_key(&key);
    match state.store.get(key.as_bytes()).await {
        Ok(value) => {
            let value = String::from_utf8_lossy(&value).into_owned();
            info!(%key, %value, "value retrieved");
            Ok((StatusCode::OK, Json(ValueResponse { value })).into_response())
        }
        Err(err @ KvmeterError::KeyNotFound(_)) => {
            info!(%key, "key not found");
            Err(err.into())
        }
        Err(err) => {
            warn!(error = %err, %key, "failed to get value");
            Err(err.into())
        }
    }
}
