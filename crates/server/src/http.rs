//! HTTP Endpoints
//!
//! REST API over the lead, KAM, contact and performance engines.

use axum::{
    extract::{Json, Path, Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Router,
};
use serde::Deserialize;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use kam_leads_core::{
    Contact, ContactDraft, ContactId, Interaction, InteractionDraft, InteractionId, Kam, KamDraft,
    KamId, KamPerformance, Lead, LeadDraft, LeadId, LeadStatus,
};

use crate::metrics::{metrics_handler, track_requests};
use crate::state::AppState;
use crate::ServerError;

type ApiResult<T> = Result<T, ServerError>;

const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let config = state.config.read();
    let cors_layer = build_cors_layer(&config.server.cors_origins, config.server.cors_enabled);
    let timeout = Duration::from_secs(config.server.timeout_seconds);
    drop(config); // Release lock before building router

    Router::new()
        // KAMs and performance
        .route("/api/kams", post(add_kam).get(list_kams))
        .route("/api/kams/performance", get(performance_for_all))
        .route("/api/kams/top-performing", get(top_performing))
        .route("/api/kams/under-performing", get(under_performing))
        .route("/api/kams/:kam_id/performance", get(performance_for))
        .route("/api/kams/:kam_id/leads", post(assign_leads).get(leads_for_kam))
        // Leads and interactions
        .route("/api/leads", post(create_lead).get(list_leads))
        .route("/api/leads/today-calls", get(today_calls))
        .route("/api/leads/:lead_id", get(get_lead))
        .route("/api/leads/:lead_id/status", patch(set_status))
        .route(
            "/api/leads/:lead_id/interactions",
            post(record_interaction).get(interactions_for),
        )
        .route("/api/interactions/:interaction_id", get(get_interaction))
        // Contacts
        .route("/api/contacts/lead/:lead_id", post(add_contact).get(contacts_for))
        .route("/api/contacts/lead/:lead_id/role/:role", get(contacts_by_role))
        .route("/api/contacts/lead/:lead_id/primary", get(primary_contact))
        .route(
            "/api/contacts/lead/:lead_id/primary/:contact_id",
            put(set_primary),
        )
        .route(
            "/api/contacts/:contact_id",
            put(update_contact).delete(delete_contact),
        )
        // Health check
        .route("/health", get(health_check))
        // Prometheus metrics
        .route("/metrics", get(metrics_handler))
        // Admin endpoints
        .route("/admin/reload-config", post(reload_config))
        .route_layer(axum::middleware::from_fn(track_requests))
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns permissive layer (for dev)
/// - If cors_origins is empty, defaults to localhost:3000
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    let parsed_origins = if parsed_origins.is_empty() {
        if !origins.is_empty() {
            tracing::error!("All configured CORS origins are invalid, falling back to localhost");
        } else {
            tracing::info!("No CORS origins configured, defaulting to localhost:3000");
        }
        vec![HeaderValue::from_static(DEFAULT_ORIGIN)]
    } else {
        tracing::info!("CORS configured with {} origins", parsed_origins.len());
        parsed_origins
    };

    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

#[derive(Debug, Deserialize)]
struct CountQuery {
    count: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct StatusQuery {
    status: String,
}

async fn add_kam(
    State(state): State<AppState>,
    Json(draft): Json<KamDraft>,
) -> ApiResult<(StatusCode, Json<Kam>)> {
    let kam = state.kams.add_kam(draft).await?;
    Ok((StatusCode::CREATED, Json(kam)))
}

/// An empty directory answers 204 with no body
async fn list_kams(State(state): State<AppState>) -> ApiResult<Response> {
    let kams = state.kams.list_kams().await?;
    if kams.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(kams).into_response())
}

async fn performance_for_all(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<KamPerformance>>> {
    Ok(Json(state.performance.performance_for_all().await?))
}

async fn performance_for(
    State(state): State<AppState>,
    Path(kam_id): Path<KamId>,
) -> ApiResult<Json<KamPerformance>> {
    Ok(Json(state.performance.performance_for(kam_id).await?))
}

async fn top_performing(
    State(state): State<AppState>,
    Query(query): Query<CountQuery>,
) -> ApiResult<Json<Vec<KamPerformance>>> {
    let count = ranking_count(&state, query);
    Ok(Json(state.performance.top_performing(count).await?))
}

async fn under_performing(
    State(state): State<AppState>,
    Query(query): Query<CountQuery>,
) -> ApiResult<Json<Vec<KamPerformance>>> {
    let count = ranking_count(&state, query);
    Ok(Json(state.performance.under_performing(count).await?))
}

fn ranking_count(state: &AppState, query: CountQuery) -> usize {
    query
        .count
        .unwrap_or_else(|| state.get_config().ranking.default_count)
}

async fn assign_leads(
    State(state): State<AppState>,
    Path(kam_id): Path<KamId>,
    Json(lead_ids): Json<Vec<LeadId>>,
) -> ApiResult<Json<Kam>> {
    Ok(Json(state.kams.assign_leads(kam_id, &lead_ids).await?))
}

async fn leads_for_kam(
    State(state): State<AppState>,
    Path(kam_id): Path<KamId>,
) -> ApiResult<Json<Vec<Lead>>> {
    Ok(Json(state.kams.leads_for_kam(kam_id).await?))
}

async fn create_lead(
    State(state): State<AppState>,
    Json(draft): Json<LeadDraft>,
) -> ApiResult<(StatusCode, Json<Lead>)> {
    let lead = state.leads.create_lead(draft).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

async fn list_leads(State(state): State<AppState>) -> ApiResult<Json<Vec<Lead>>> {
    Ok(Json(state.leads.list_leads().await?))
}

/// Today's call queue; an empty queue is still 200
async fn today_calls(State(state): State<AppState>) -> ApiResult<Json<Vec<Lead>>> {
    Ok(Json(state.leads.due_today().await?))
}

async fn get_lead(
    State(state): State<AppState>,
    Path(lead_id): Path<LeadId>,
) -> ApiResult<Json<Lead>> {
    Ok(Json(state.leads.lead(lead_id).await?))
}

async fn set_status(
    State(state): State<AppState>,
    Path(lead_id): Path<LeadId>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<Lead>> {
    let status: LeadStatus = query.status.parse()?;
    Ok(Json(state.leads.set_status(lead_id, status).await?))
}

async fn record_interaction(
    State(state): State<AppState>,
    Path(lead_id): Path<LeadId>,
    Json(draft): Json<InteractionDraft>,
) -> ApiResult<(StatusCode, Json<Interaction>)> {
    let interaction = state.leads.record_interaction(lead_id, draft).await?;
    Ok((StatusCode::CREATED, Json(interaction)))
}

async fn interactions_for(
    State(state): State<AppState>,
    Path(lead_id): Path<LeadId>,
) -> ApiResult<Json<Vec<Interaction>>> {
    Ok(Json(state.leads.interactions_for(lead_id).await?))
}

async fn get_interaction(
    State(state): State<AppState>,
    Path(interaction_id): Path<InteractionId>,
) -> ApiResult<Json<Interaction>> {
    Ok(Json(state.leads.interaction(interaction_id).await?))
}

async fn add_contact(
    State(state): State<AppState>,
    Path(lead_id): Path<LeadId>,
    Json(draft): Json<ContactDraft>,
) -> ApiResult<(StatusCode, Json<Contact>)> {
    let contact = state.contacts.add_contact(lead_id, draft).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn contacts_for(
    State(state): State<AppState>,
    Path(lead_id): Path<LeadId>,
) -> ApiResult<Json<Vec<Contact>>> {
    Ok(Json(state.contacts.contacts_for(lead_id).await?))
}

async fn contacts_by_role(
    State(state): State<AppState>,
    Path((lead_id, role)): Path<(LeadId, String)>,
) -> ApiResult<Json<Vec<Contact>>> {
    Ok(Json(state.contacts.contacts_by_role(lead_id, &role).await?))
}

async fn primary_contact(
    State(state): State<AppState>,
    Path(lead_id): Path<LeadId>,
) -> ApiResult<Json<Contact>> {
    Ok(Json(state.contacts.primary_contact(lead_id).await?))
}

async fn set_primary(
    State(state): State<AppState>,
    Path((lead_id, contact_id)): Path<(LeadId, ContactId)>,
) -> ApiResult<Json<Contact>> {
    Ok(Json(state.contacts.set_primary(lead_id, contact_id).await?))
}

async fn update_contact(
    State(state): State<AppState>,
    Path(contact_id): Path<ContactId>,
    Json(draft): Json<ContactDraft>,
) -> ApiResult<Json<Contact>> {
    Ok(Json(state.contacts.update_contact(contact_id, draft).await?))
}

async fn delete_contact(
    State(state): State<AppState>,
    Path(contact_id): Path<ContactId>,
) -> ApiResult<StatusCode> {
    state.contacts.delete_contact(contact_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// POST /admin/reload-config
///
/// Reloads configuration from disk. CORS and the store are only applied at
/// startup.
async fn reload_config(State(state): State<AppState>) -> impl IntoResponse {
    match state.reload_config() {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "success",
                "message": "Configuration reloaded successfully"
            })),
        ),
        Err(e) => {
            tracing::error!("Config reload failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "status": "error",
                    "message": e
                })),
            )
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kam_leads_config::Settings;

    #[test]
    fn test_router_creation() {
        let state = AppState::new(Settings::default());
        let _ = create_router(state);
    }

    #[test]
    fn test_cors_layer_variants() {
        let _ = build_cors_layer(&[], true);
        let _ = build_cors_layer(&[], false);
        let _ = build_cors_layer(&["https://crm.example.com".to_string()], true);
        let _ = build_cors_layer(&["bad\norigin".to_string()], true);
    }
}
