//! HTTP API for StoryChain.

use crate::error::Error;
use crate::models::Chain;
use crate::node::NodeState;
use crate::service::ContributeOutcome;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

type AppState = Arc<NodeState>;

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    // CORS layer for browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health
        .route("/health", get(health))
        // Chains
        .route("/chains", post(create_chain))
        .route("/chains/:id/contribute", post(contribute))
        .route("/chains/:id", get(get_chain))
        // Public configuration
        .route("/config", get(get_config))
        .layer(cors)
        .with_state(state)
}

// --- Health endpoint ---

async fn health() -> &'static str {
    "OK"
}

// --- Chain endpoints ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateChainResponse {
    chain_id: String,
}

async fn create_chain(
    State(state): State<AppState>,
) -> Result<Json<CreateChainResponse>, ApiError> {
    let chain_id = state.service.create_chain()?;
    Ok(Json(CreateChainResponse { chain_id }))
}

#[derive(Debug, Deserialize)]
struct ContributeRequest {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ContributeResponse {
    Accepted { done: bool, contributions: usize },
    Finished { done: bool, paragraph: String },
}

async fn contribute(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ContributeRequest>,
) -> Result<Json<ContributeResponse>, ApiError> {
    let outcome = state.service.contribute(&id, &req.text).await?;

    Ok(Json(match outcome {
        ContributeOutcome::Accepted { count } => ContributeResponse::Accepted {
            done: false,
            contributions: count,
        },
        ContributeOutcome::Finished { paragraph } => ContributeResponse::Finished {
            done: true,
            paragraph,
        },
    }))
}

#[derive(Debug, Serialize)]
struct ChainViewResponse {
    chain: Chain,
    contributions: Vec<String>,
}

async fn get_chain(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ChainViewResponse>, ApiError> {
    let view = state.service.chain_view(&id)?;
    Ok(Json(ChainViewResponse {
        chain: view.chain,
        contributions: view.contributions,
    }))
}

// --- Config endpoint ---

/// Public, non-secret configuration only.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigResponse {
    receiver_address: Option<String>,
}

async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        receiver_address: state.config.receiver_address.clone(),
    })
}

// --- Error mapping ---

/// Wrapper carrying a service error to its HTTP representation.
struct ApiError(Error);

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contribute_response_shapes() {
        let accepted = ContributeResponse::Accepted {
            done: false,
            contributions: 5,
        };
        let json = serde_json::to_string(&accepted).unwrap();
        assert_eq!(json, r#"{"done":false,"contributions":5}"#);

        let finished = ContributeResponse::Finished {
            done: true,
            paragraph: "The end.".to_string(),
        };
        let json = serde_json::to_string(&finished).unwrap();
        assert_eq!(json, r#"{"done":true,"paragraph":"The end."}"#);
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let response =
            ApiError(Error::Validation("no links allowed".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = ApiError(Error::NotFound("chain x".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn generation_maps_to_server_error() {
        let response = ApiError(Error::Generation("upstream".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
