use axum::{
	Json, Router,
	extract::{Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use serde::{Deserialize, Serialize};

use gallery_domain::query::{SearchQuery, SearchQueryKind};
use gallery_service::{AutoCompleteItem, Error as ServiceError, Media, SearchResult};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/search", post(search))
		.route("/v1/search/random", post(random_match))
		.route("/v1/autocomplete", get(autocomplete))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search(
	State(state): State<AppState>,
	Json(query): Json<SearchQuery>,
) -> Result<Json<SearchResult>, ApiError> {
	let result = state.service.search(query).await?;

	Ok(Json(result))
}

async fn random_match(
	State(state): State<AppState>,
	Json(query): Json<SearchQuery>,
) -> Result<Json<Media>, ApiError> {
	match state.service.random_match(query).await? {
		Some(media) => Ok(Json(media)),
		None => Err(json_error(StatusCode::NOT_FOUND, "NO_MATCH", "No media matches the query.")),
	}
}

#[derive(Debug, Deserialize)]
struct AutoCompleteParams {
	text: String,
	#[serde(rename = "type", default = "default_category")]
	category: SearchQueryKind,
}

fn default_category() -> SearchQueryKind {
	SearchQueryKind::AnyText
}

async fn autocomplete(
	State(state): State<AppState>,
	Query(params): Query<AutoCompleteParams>,
) -> Result<Json<Vec<AutoCompleteItem>>, ApiError> {
	let items = state.service.autocomplete(&params.text, params.category).await?;

	Ok(Json(items))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		let message = err.to_string();

		match err {
			ServiceError::InvalidQueryShape { .. } | ServiceError::UnsupportedNode { .. } =>
				json_error(StatusCode::BAD_REQUEST, "INVALID_QUERY", message),
			ServiceError::MissingGeoData { .. } =>
				json_error(StatusCode::BAD_REQUEST, "MISSING_GEO_DATA", message),
			ServiceError::GeoResolutionNotFound { .. } =>
				json_error(StatusCode::NOT_FOUND, "PLACE_NOT_FOUND", message),
			ServiceError::Provider { .. } => {
				tracing::error!(error = %message, "Gazetteer request failed.");

				json_error(StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", message)
			},
			ServiceError::Storage { .. } | ServiceError::RowOrderingViolation { .. } => {
				tracing::error!(error = %message, "Search request failed.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}

fn json_error(status: StatusCode, code: &str, message: impl Into<String>) -> ApiError {
	ApiError { status, error_code: code.to_string(), message: message.into() }
}
