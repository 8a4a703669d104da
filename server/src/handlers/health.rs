use std::convert::Infallible;

use anyhow::Result;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Response, StatusCode};
use serde_json::json;

use crate::AppState;
use crate::handlers::json_response::deliver_serialized_json;

pub async fn handle_health(state: &AppState) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    deliver_serialized_json(
        &json!({
            "status": "ok",
            "accounts": state.directory.len().await,
        }),
        StatusCode::OK,
    )
}
