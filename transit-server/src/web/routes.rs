//! HTTP route handlers.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post, put},
};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::ingest::{BaseRequest, BusPatch, IngestError, LoadDocument, MutationDocument};
use crate::service::{ServiceError, StatResponse};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/load", post(load))
        .route("/query", post(query))
        .route("/stop", put(put_stops))
        .route("/bus", put(put_buses))
        .route("/patch", patch(patch_bus))
        .route("/stops/:name", get(get_stop))
        .route("/buses/:name", get(get_bus))
        .route("/route", get(get_route))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Parse a JSON body, logging it on failure.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "invalid JSON body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })
}

/// Replace the whole dataset.
async fn load(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LoadResponse>, AppError> {
    let document: LoadDocument = parse_body(&body)?;
    let summary = state.service.load(document).await?;
    Ok(Json(summary.into()))
}

/// Answer a batch of stat requests.
async fn query(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<StatResponse>>, AppError> {
    let document: QueryDocument = parse_body(&body)?;
    let responses = state.service.answer(&document.stat_requests).await?;
    Ok(Json(responses))
}

/// Which record type a mutation endpoint accepts.
#[derive(Debug, Clone, Copy)]
enum RecordKind {
    Stop,
    Bus,
}

impl RecordKind {
    fn accepts(self, request: &BaseRequest) -> bool {
        matches!(
            (self, request),
            (RecordKind::Stop, BaseRequest::Stop(_)) | (RecordKind::Bus, BaseRequest::Bus(_))
        )
    }
}

async fn mutate(state: &AppState, body: &Bytes, kind: RecordKind) -> Result<(), AppError> {
    let document: MutationDocument = parse_body(body)?;
    if let Some(other) = document.base_requests.iter().find(|r| !kind.accepts(r)) {
        return Err(AppError::BadRequest {
            message: format!("Unexpected record for {kind:?} endpoint: {other:?}"),
        });
    }
    state.service.add_stops_and_buses(document).await?;
    Ok(())
}

/// Add or redefine stops.
async fn put_stops(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>, AppError> {
    mutate(&state, &body, RecordKind::Stop).await?;
    Ok(Json(StatusResponse::ok()))
}

/// Add or redefine buses.
async fn put_buses(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>, AppError> {
    mutate(&state, &body, RecordKind::Bus).await?;
    Ok(Json(StatusResponse::ok()))
}

/// Insert a stop into a bus and/or change its roundtrip flag.
async fn patch_bus(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<StatusResponse>, AppError> {
    let patch: BusPatch = parse_body(&body)?;
    state.service.patch_bus(&patch).await?;
    Ok(Json(StatusResponse::ok()))
}

/// Buses serving one stop.
async fn get_stop(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<StopResponse>, AppError> {
    let buses = state.service.stop_buses(&name).await?;
    Ok(Json(StopResponse {
        buses: buses.into_iter().collect(),
    }))
}

/// Statistics of one bus.
async fn get_bus(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<BusResponse>, AppError> {
    let stat = state.service.bus_stat(&name).await?;
    Ok(Json(stat.into()))
}

/// Fastest route between two stops.
async fn get_route(
    State(state): State<AppState>,
    query: Result<Query<RouteQuery>, QueryRejection>,
) -> Result<Json<RouteResponse>, AppError> {
    let Query(req) = query.map_err(|e| AppError::BadRequest {
        message: format!("Invalid route query: {}", e.body_text()),
    })?;
    let itinerary = state.service.route(&req.from, &req.to).await?;
    Ok(Json(RouteResponse::from(&itinerary)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Conflict { message: String },
    Unprocessable { message: String },
    Internal { message: String },
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        let message = e.to_string();
        match e {
            ServiceError::NotLoaded => AppError::Conflict { message },
            ServiceError::StopNotFound(_)
            | ServiceError::BusNotFound(_)
            | ServiceError::Unreachable { .. } => AppError::NotFound { message },
            ServiceError::Malformed(_) => AppError::BadRequest { message },
            ServiceError::Routing(_) => AppError::Unprocessable { message },
            ServiceError::Ingest(e) => match e {
                IngestError::UnknownStop { .. }
                | IngestError::UnknownBus(_)
                | IngestError::Catalogue(_) => AppError::NotFound { message },
                IngestError::Malformed(_) | IngestError::PositionOutOfRange { .. } => {
                    AppError::BadRequest { message }
                }
            },
            ServiceError::Io { .. } | ServiceError::Rebuild(_) => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Unprocessable { message } => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::Response;
    use serde_json::{Value, json};

    use crate::routing::RoutingError;

    fn dataset() -> Bytes {
        Bytes::from(
            json!({
                "base_requests": [
                    {"type": "Bus", "name": "297", "stops": ["Biryulyovo", "Universam"], "is_roundtrip": false},
                    {"type": "Stop", "name": "Biryulyovo", "latitude": 55.574371, "longitude": 37.6517,
                     "road_distances": {"Universam": 2400}},
                    {"type": "Stop", "name": "Universam", "latitude": 55.587655, "longitude": 37.645687},
                    {"type": "Stop", "name": "Tolstopaltsevo", "latitude": 55.611087, "longitude": 37.20829}
                ],
                "routing_settings": {"bus_wait_time": 2, "bus_velocity": 30},
                "render_settings": {"width": 200}
            })
            .to_string(),
        )
    }

    async fn loaded() -> AppState {
        let state = AppState::default();
        load(State(state.clone()), dataset()).await.unwrap();
        state
    }

    async fn error_response(err: AppError) -> (StatusCode, Value) {
        let response: Response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn router_builds() {
        let _ = create_router(AppState::default());
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn load_reports_graph_size() {
        let state = AppState::default();
        let Json(response) = load(State(state), dataset()).await.unwrap();
        assert_eq!(response.status, "ok");
        assert_eq!(response.stops, 3);
        assert_eq!(response.buses, 1);
        assert_eq!(response.vertices, 6);
        assert_eq!(response.edges, 3 + 2);
    }

    #[tokio::test]
    async fn load_rejects_bad_settings() {
        let state = AppState::default();
        let body = Bytes::from(
            json!({
                "base_requests": [],
                "routing_settings": {"bus_wait_time": 2}
            })
            .to_string(),
        );
        let err = load(State(state), body).await.unwrap_err();
        let (status, body) = error_response(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("bus_velocity"));
    }

    #[tokio::test]
    async fn invalid_json_is_bad_request() {
        let err = load(State(AppState::default()), Bytes::from_static(b"{"))
            .await
            .unwrap_err();
        let (status, _) = error_response(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn query_before_load_is_conflict() {
        let body = Bytes::from(json!({"stat_requests": []}).to_string());
        let err = query(State(AppState::default()), body).await.unwrap_err();
        let (status, _) = error_response(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn query_answers_batch() {
        let state = loaded().await;
        let body = Bytes::from(
            json!({
                "stat_requests": [
                    {"type": "Route", "id": 1, "from": "Biryulyovo", "to": "Universam"},
                    {"type": "Bus", "id": 2, "name": "751"},
                    {"type": "Stop", "id": 3, "name": "Universam"}
                ]
            })
            .to_string(),
        );
        let Json(responses) = query(State(state), body).await.unwrap();
        let value = serde_json::to_value(&responses).unwrap();

        // 2400 m at 500 m/min
        assert_eq!(value[0]["total_time"], json!(2.0 + 4.8));
        assert_eq!(value[0]["items"][1]["type"], "Bus");
        assert_eq!(value[1], json!({"request_id": 2, "error_message": "not found"}));
        assert_eq!(value[2], json!({"request_id": 3, "buses": ["297"]}));
    }

    #[tokio::test]
    async fn query_with_map_answers_the_rest() {
        let state = loaded().await;
        let body = Bytes::from(
            json!({
                "stat_requests": [
                    {"type": "Bus", "id": 1, "name": "297"},
                    {"type": "Map", "id": 2},
                    {"type": "Stop", "id": 3, "name": "Universam"}
                ]
            })
            .to_string(),
        );
        let Json(responses) = query(State(state), body).await.unwrap();
        let value = serde_json::to_value(&responses).unwrap();

        assert_eq!(value[0]["request_id"], 1);
        assert_eq!(value[0]["stop_count"], 3);
        assert_eq!(value[1], json!({"request_id": 2, "error_message": "not found"}));
        assert_eq!(value[2], json!({"request_id": 3, "buses": ["297"]}));
    }

    #[tokio::test]
    async fn incomplete_route_query_is_json_bad_request() {
        let state = loaded().await;
        let uri: axum::http::Uri = "/route?from=Biryulyovo".parse().unwrap();

        let err = get_route(State(state), Query::try_from_uri(&uri))
            .await
            .unwrap_err();
        let (status, body) = error_response(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("to"));
    }

    #[tokio::test]
    async fn single_lookups() {
        let state = loaded().await;

        let Json(stop) = get_stop(State(state.clone()), Path("Biryulyovo".to_string()))
            .await
            .unwrap();
        assert_eq!(stop.buses, vec!["297"]);

        let Json(bus) = get_bus(State(state.clone()), Path("297".to_string()))
            .await
            .unwrap();
        assert_eq!(bus.stop_count, 3);
        assert_eq!(bus.route_length, 4800);

        let err = get_route(
            State(state),
            Ok(Query(RouteQuery {
                from: "Biryulyovo".into(),
                to: "Tolstopaltsevo".into(),
            })),
        )
        .await
        .unwrap_err();
        let (status, body) = error_response(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("Tolstopaltsevo"));
    }

    #[tokio::test]
    async fn put_and_patch_extend_dataset() {
        let state = loaded().await;

        let stops = Bytes::from(
            json!({"base_requests": [
                {"type": "Stop", "name": "Rasskazovka", "latitude": 55.632761, "longitude": 37.333324}
            ]})
            .to_string(),
        );
        put_stops(State(state.clone()), stops).await.unwrap();

        let buses = Bytes::from(
            json!({"base_requests": [
                {"type": "Bus", "name": "750", "stops": ["Tolstopaltsevo", "Rasskazovka"], "is_roundtrip": false}
            ]})
            .to_string(),
        );
        put_buses(State(state.clone()), buses).await.unwrap();

        let patch = Bytes::from(
            json!({"name": "297", "insert": {"stop": "Tolstopaltsevo", "position": 2}}).to_string(),
        );
        let Json(status) = patch_bus(State(state.clone()), patch).await.unwrap();
        assert_eq!(status.status, "ok");

        let Json(route) = get_route(
            State(state),
            Ok(Query(RouteQuery {
                from: "Biryulyovo".into(),
                to: "Rasskazovka".into(),
            })),
        )
        .await
        .unwrap();
        let buses: Vec<_> = route
            .items
            .iter()
            .filter_map(|item| match item {
                crate::service::RouteItem::Bus { bus, .. } => Some(bus.as_str()),
                crate::service::RouteItem::Wait { .. } => None,
            })
            .collect();
        assert_eq!(buses, vec!["297", "750"]);
    }

    #[tokio::test]
    async fn wrong_record_kind_is_rejected() {
        let state = loaded().await;
        let body = Bytes::from(
            json!({"base_requests": [
                {"type": "Bus", "name": "1", "stops": ["Universam"], "is_roundtrip": true}
            ]})
            .to_string(),
        );
        let err = put_stops(State(state.clone()), body).await.unwrap_err();
        let (status, _) = error_response(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let Json(stop) = get_stop(State(state), Path("Universam".to_string()))
            .await
            .unwrap();
        assert_eq!(stop.buses, vec!["297"]);
    }

    #[tokio::test]
    async fn patch_errors_map_to_statuses() {
        let state = loaded().await;

        let unknown = Bytes::from(json!({"name": "999", "is_roundtrip": true}).to_string());
        let err = patch_bus(State(state.clone()), unknown).await.unwrap_err();
        assert_eq!(error_response(err).await.0, StatusCode::NOT_FOUND);

        let out_of_range = Bytes::from(
            json!({"name": "297", "insert": {"stop": "Universam", "position": 9}}).to_string(),
        );
        let err = patch_bus(State(state), out_of_range).await.unwrap_err();
        assert_eq!(error_response(err).await.0, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn service_errors_map_to_statuses() {
        let status = |e: ServiceError| AppError::from(e).into_response().status();

        assert_eq!(status(ServiceError::NotLoaded), StatusCode::CONFLICT);
        assert_eq!(
            status(ServiceError::BusNotFound("1".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(ServiceError::Malformed("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(RoutingError::InvalidVelocity(-1.0).into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status(ServiceError::Io {
                path: "x".into(),
                message: "gone".into()
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
