//! HTTP surface: notes and categories CRUD plus the enrichment endpoints.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use annota_core::{
    CreateCategory, CreateNote, EnrichmentResult, Note, Page, SearchNotes, UpdateCategory,
    UpdateNote,
};
use annota_enrich::{derived_patch, keywords};

use crate::error::ApiError;
use crate::state::AppState;

/// Upper bound for list page sizes.
const MAX_PAGE_LIMIT: i64 = 200;

/// Upper bound for requested summary lengths, in characters.
const MAX_SUMMARY_LENGTH: usize = 2000;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
pub struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// REQUEST / RESPONSE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
}

/// Partial note update. `summary` and `sentiment` are derived fields and are
/// deliberately not accepted from clients.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_ids: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Search criteria. A natural-language query is reduced to its top
/// keywords, which then take the place of an explicit `keyword`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchNotesRequest {
    pub keyword: Option<String>,
    pub category_id: Option<Uuid>,
    pub natural_language_query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeQuery {
    pub max_length: Option<usize>,
}

/// Enrichment payload returned to clients, always with provenance attached.
#[derive(Debug, Serialize)]
pub struct EnrichmentResponse {
    pub note_id: Uuid,
    #[serde(flatten)]
    pub result: EnrichmentResult,
}

// =============================================================================
// ROUTER
// =============================================================================

/// Build the application router with the full middleware stack.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Notes CRUD
        .route("/api/v1/notes", get(list_notes).post(create_note))
        .route("/api/v1/notes/search", post(search_notes))
        .route(
            "/api/v1/notes/:id",
            get(get_note)
                .put(update_note)
                .patch(update_note)
                .delete(delete_note),
        )
        // Enrichment
        .route("/api/v1/notes/:id/summarize", get(summarize_note))
        .route("/api/v1/notes/:id/sentiment", get(sentiment_note))
        .route("/api/v1/notes/:id/suggest-category", post(suggest_category))
        // Categories CRUD
        .route(
            "/api/v1/categories",
            get(list_categories).post(create_category),
        )
        .route(
            "/api/v1/categories/:id",
            get(get_category)
                .put(update_category)
                .patch(update_category)
                .delete(delete_category),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(parse_allowed_origins()))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                ]),
        )
        .with_state(state)
}

/// Strict CORS origin whitelist from `ALLOWED_ORIGINS` (comma-separated).
fn parse_allowed_origins() -> Vec<HeaderValue> {
    let origins_str = std::env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());

    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            tracing::warn!("Rate limit exceeded");
            return Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(serde_json::json!({
                    "error": "rate_limit_exceeded",
                    "error_description": "Too many requests. Please wait before retrying."
                })),
            ));
        }
    }
    Ok(next.run(request).await)
}

// =============================================================================
// HEALTH
// =============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// =============================================================================
// NOTE HANDLERS
// =============================================================================

fn page_from_query(q: &ListQuery) -> Result<Page, ApiError> {
    let mut page = Page::default();
    if let Some(limit) = q.limit {
        if limit <= 0 || limit > MAX_PAGE_LIMIT {
            return Err(ApiError::BadRequest(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            )));
        }
        page.limit = limit;
    }
    if let Some(offset) = q.offset {
        if offset < 0 {
            return Err(ApiError::BadRequest("offset must not be negative".to_string()));
        }
        page.offset = offset;
    }
    Ok(page)
}

async fn list_notes(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let page = page_from_query(&q)?;
    let notes = state.db.notes.list(page).await?;
    Ok(Json(notes))
}

async fn search_notes(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
    Json(req): Json<SearchNotesRequest>,
) -> Result<Json<Vec<Note>>, ApiError> {
    let page = page_from_query(&q)?;

    // A natural-language query is distilled to its two strongest keywords,
    // which override an explicit keyword when extraction yields anything.
    let mut keyword = req.keyword;
    if let Some(nl) = req.natural_language_query.as_deref() {
        let extracted = keywords::extract_keywords(nl, 2);
        if !extracted.is_empty() {
            keyword = Some(extracted.join(" "));
        }
    }

    let notes = state
        .db
        .notes
        .search(
            SearchNotes {
                keyword,
                category_id: req.category_id,
            },
            page,
        )
        .await?;
    Ok(Json(notes))
}

async fn create_note(
    State(state): State<AppState>,
    Json(req): Json<CreateNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Note title cannot be empty".to_string()));
    }
    if req.content.trim().is_empty() {
        return Err(ApiError::BadRequest("Note content cannot be empty".to_string()));
    }

    let note = state
        .db
        .notes
        .create(CreateNote {
            title: req.title,
            content: req.content,
            category_ids: req.category_ids,
        })
        .await?;

    let note = enrich_and_persist(&state, note).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

async fn get_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Note>, ApiError> {
    let note = state.db.notes.get(id).await?;
    Ok(Json(note))
}

async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateNoteRequest>,
) -> Result<Json<Note>, ApiError> {
    if req.title.is_none() && req.content.is_none() && req.category_ids.is_none() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    if req.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(ApiError::BadRequest("Note title cannot be empty".to_string()));
    }
    if req.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
        return Err(ApiError::BadRequest("Note content cannot be empty".to_string()));
    }

    let note = state
        .db
        .notes
        .update(
            id,
            UpdateNote {
                title: req.title,
                content: req.content,
                category_ids: req.category_ids,
                ..Default::default()
            },
        )
        .await?;

    let note = enrich_and_persist(&state, note).await?;
    Ok(Json(note))
}

/// Write-path enrichment: sentiment always, summary when the trigger policy
/// is automatic. The derived fields are merged onto the stored note with a
/// last-write-wins partial update.
async fn enrich_and_persist(state: &AppState, note: Note) -> Result<Note, ApiError> {
    let results = state.pipeline.enrich_for_write(&note.title, &note.content).await;
    let patch = derived_patch(&results);
    if patch.is_empty() {
        return Ok(note);
    }
    let note = state.db.notes.update(note.id, patch).await?;
    Ok(note)
}

async fn delete_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.notes.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// ENRICHMENT HANDLERS
// =============================================================================

async fn summarize_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(q): Query<SummarizeQuery>,
) -> Result<Json<EnrichmentResponse>, ApiError> {
    if let Some(max_length) = q.max_length {
        if max_length == 0 || max_length > MAX_SUMMARY_LENGTH {
            return Err(ApiError::BadRequest(format!(
                "max_length must be between 1 and {}",
                MAX_SUMMARY_LENGTH
            )));
        }
    }

    let note = state.db.notes.get(id).await?;
    let result = state
        .pipeline
        .summarize(&note.title, &note.content, q.max_length)
        .await;

    // Only real summaries are persisted; placeholders stay response-only.
    if result.is_real() {
        state
            .db
            .notes
            .update(
                id,
                UpdateNote {
                    summary: Some(result.payload.clone()),
                    ..Default::default()
                },
            )
            .await?;
    }

    Ok(Json(EnrichmentResponse { note_id: id, result }))
}

async fn sentiment_note(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrichmentResponse>, ApiError> {
    let note = state.db.notes.get(id).await?;
    let result = state
        .pipeline
        .analyze_sentiment(&note.title, &note.content)
        .await;

    let patch = derived_patch(std::slice::from_ref(&result));
    if !patch.is_empty() {
        state.db.notes.update(id, patch).await?;
    }

    Ok(Json(EnrichmentResponse { note_id: id, result }))
}

async fn suggest_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EnrichmentResponse>, ApiError> {
    let note = state.db.notes.get(id).await?;
    let categories = state.db.categories.list().await?;
    let result = state
        .pipeline
        .suggest_category(&note.title, &note.content, &categories)
        .await;

    // Suggestions are advisory: nothing is persisted until the client
    // assigns the category through a normal note update.
    Ok(Json(EnrichmentResponse { note_id: id, result }))
}

// =============================================================================
// CATEGORY HANDLERS
// =============================================================================

async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<annota_core::Category>>, ApiError> {
    let categories = state.db.categories.list().await?;
    Ok(Json(categories))
}

async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Category name cannot be empty".to_string()));
    }

    let category = state
        .db
        .categories
        .create(CreateCategory {
            name: req.name,
            description: req.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<annota_core::Category>, ApiError> {
    let category = state.db.categories.get(id).await?;
    Ok(Json(category))
}

async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<annota_core::Category>, ApiError> {
    if req.name.is_none() && req.description.is_none() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }
    if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ApiError::BadRequest("Category name cannot be empty".to_string()));
    }

    let category = state
        .db
        .categories
        .update(
            id,
            UpdateCategory {
                name: req.name,
                description: req.description,
            },
        )
        .await?;

    Ok(Json(category))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.db.categories.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
