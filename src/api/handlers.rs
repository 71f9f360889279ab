use crate::api::AppState;
use crate::domain::model::AccountingInfoRequest;
use crate::utils::error::AccountingError;
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Raw query string values; parsed by hand so each failure gets its own message.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub account_name: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, message).into_response()
}

fn parse_page_param(name: &str, raw: Option<&str>) -> Result<u32, Response> {
    let value: u32 = raw
        .unwrap_or_default()
        .parse()
        .map_err(|e| bad_request(format!("couldn't decode {}: {}", name, e)))?;

    if value == 0 {
        return Err(bad_request(format!("{} must be at least 1", name)));
    }
    Ok(value)
}

impl IntoResponse for AccountingError {
    fn into_response(self) -> Response {
        match self {
            AccountingError::Validation(errors) => {
                let body = serde_json::json!({
                    "error": format!("invalid request payload: {}", errors),
                    "violations": errors.violations,
                });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AccountingError::Store(e) if e.is_fatal() => {
                tracing::error!("💥 Store misuse, this is a bug: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("unexpected error: {}", e),
                )
                    .into_response()
            }
            other => {
                tracing::warn!("Unexpected error: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("unexpected error: {}", other),
                )
                    .into_response()
            }
        }
    }
}

/// Axum handler function for POST /api/v0/accountinginfo
pub async fn create_accounting_info(State(state): State<AppState>, body: Bytes) -> Response {
    let request: AccountingInfoRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => return bad_request(format!("couldn't decode request body: {}", e)),
    };
    info!(
        "POST /api/v0/accountinginfo - accountName: {}",
        request.account_name
    );

    match state.service.store_accounting_info(request).await {
        Ok(id) => (StatusCode::CREATED, Json(CreatedResponse { id })).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Axum handler function for GET /api/v0/accountinginfo
pub async fn list_accounting_info(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Response {
    info!("GET /api/v0/accountinginfo - query: {:?}", query);

    let page = match parse_page_param("page", query.page.as_deref()) {
        Ok(page) => page,
        Err(response) => return response,
    };
    let page_size = match parse_page_param("pageSize", query.page_size.as_deref()) {
        Ok(page_size) => page_size,
        Err(response) => return response,
    };
    let account_name = match query.account_name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => return bad_request("accountName is missing".to_string()),
    };

    match state
        .service
        .list_accounting_info(account_name, page, page_size)
        .await
    {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => e.into_response(),
    }
}
