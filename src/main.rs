//! Tadabbur - HTTP surface over the Quran search core

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tadabbur_lib::analysis::{
    apply_phrase_filter, count_occurrences, filter_exact_word, find_neighbors, find_occurrences,
    find_phrase_filters, query_words, Occurrence, OccurrenceCounts, PhraseFilter,
};
use tadabbur_lib::{AppState, CacheStats, Config, MatchResult, TadabburError, Verse, VerseRef};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tracing_subscriber::EnvFilter;

/// Every route is a GET or DELETE driven by the query string
const MAX_BODY_BYTES: usize = 4 * 1024;

type ApiError = (StatusCode, Json<ErrorResponse>);

// === Request/Response types ===

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
    /// Keep only whole-word matches (single-word queries)
    exact: Option<bool>,
    /// Narrow to results containing one of the suggested phrases
    phrase: Option<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

#[derive(Deserialize)]
struct TextQuery {
    q: String,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum SearchResponse {
    Reference {
        reference: VerseRef,
        verse: Verse,
    },
    Matches {
        total_hits: usize,
        result: MatchResult,
        counts: OccurrenceCounts,
        occurrences: Vec<Occurrence>,
    },
}

#[derive(Serialize)]
struct ReferenceResponse {
    reference: VerseRef,
    verse: Option<Verse>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    verses: usize,
    vocabulary: usize,
    chapters: usize,
}

#[derive(Serialize)]
struct InvalidateResponse {
    removed: bool,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse { error: message.into() }))
}

fn api_error(err: TadabburError) -> ApiError {
    let status = match &err {
        TadabburError::NotFound(_) => StatusCode::NOT_FOUND,
        TadabburError::Edition(_) | TadabburError::Config(_) => StatusCode::BAD_REQUEST,
        TadabburError::Network(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error(status, err.to_string())
}

/// Run a search off the async runtime
async fn run_search(state: &Arc<AppState>, query: String) -> Result<MatchResult, ApiError> {
    let engine = Arc::clone(&state.search_engine);
    tokio::task::spawn_blocking(move || engine.search(&query))
        .await
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, format!("Task join error: {}", e)))
}

// === Handlers ===

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let engine = &state.search_engine;
    Json(HealthResponse {
        status: "ok".to_string(),
        verses: engine.plain().len(),
        vocabulary: engine.vocabulary().len(),
        chapters: engine.plain().chapters().len(),
    })
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, ApiError> {
    if let Some(reference) = state.search_engine.parse_reference(&params.q) {
        if let Some(verse) = state.search_engine.plain().verse(reference.chapter, reference.verse) {
            return Ok(Json(SearchResponse::Reference {
                reference,
                verse: verse.clone(),
            }));
        }
    }

    let started = std::time::Instant::now();
    let mut result = run_search(&state, params.q.clone()).await?;
    let words = query_words(result.effective_query());

    if params.exact.unwrap_or(false) && words.len() == 1 {
        result.verses = filter_exact_word(&result.verses, &words[0]);
    }
    if let Some(phrase) = params.phrase.as_deref().filter(|p| !p.is_empty()) {
        result.verses = apply_phrase_filter(&result.verses, phrase);
    }

    let total_hits = result.len();
    let counts = count_occurrences(&result.verses, &words);

    // occurrences index into the returned page
    let limit = params.limit.unwrap_or(50).min(500);
    let offset = params.offset.unwrap_or(0);
    result.verses = result.verses.into_iter().skip(offset).take(limit).collect();
    let occurrences = find_occurrences(&result.verses, result.effective_query());

    tracing::info!(
        query = %params.q,
        hits = total_hits,
        corrected = ?result.corrected_query,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "search"
    );

    Ok(Json(SearchResponse::Matches {
        total_hits,
        result,
        counts,
        occurrences,
    }))
}

async fn reference(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TextQuery>,
) -> Result<Json<ReferenceResponse>, ApiError> {
    let reference = state
        .search_engine
        .parse_reference(&params.q)
        .ok_or_else(|| api_error(TadabburError::NotFound(format!("no verse reference in {:?}", params.q))))?;
    let verse = state
        .search_engine
        .plain()
        .verse(reference.chapter, reference.verse)
        .cloned();
    Ok(Json(ReferenceResponse { reference, verse }))
}

async fn verses_by_number(
    State(state): State<Arc<AppState>>,
    Path(number): Path<u32>,
) -> Json<Vec<Verse>> {
    Json(state.search_engine.search_by_verse_number(number))
}

async fn neighbor_suggestions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TextQuery>,
) -> Result<Json<Vec<String>>, ApiError> {
    let result = run_search(&state, params.q).await?;
    Ok(Json(find_neighbors(&result.verses, result.effective_query())))
}

async fn phrase_suggestions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TextQuery>,
) -> Result<Json<Vec<PhraseFilter>>, ApiError> {
    let result = run_search(&state, params.q).await?;
    let words = query_words(result.effective_query());
    Ok(Json(find_phrase_filters(&result.verses, &words)))
}

async fn cache_stats(State(state): State<Arc<AppState>>) -> Result<Json<CacheStats>, ApiError> {
    state
        .corpus_cache
        .stats()
        .map(Json)
        .map_err(api_error)
}

async fn invalidate_edition(
    State(state): State<Arc<AppState>>,
    Path(identifier): Path<String>,
) -> Result<Json<InvalidateResponse>, ApiError> {
    let removed = state
        .corpus_cache
        .invalidate(&identifier)
        .map_err(api_error)?;
    tracing::info!(identifier = %identifier, removed, "cache invalidation");
    Ok(Json(InvalidateResponse { removed }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    tracing::info!(data_dir = ?config.data_dir, "using data directory");
    let bind_addr = config.bind_addr.clone();

    let state = Arc::new(AppState::load(config).await?);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/search", get(search))
        .route("/reference", get(reference))
        .route("/verses/number/:number", get(verses_by_number))
        .route("/suggestions/neighbors", get(neighbor_suggestions))
        .route("/suggestions/phrases", get(phrase_suggestions))
        .route("/cache", get(cache_stats))
        .route("/cache/:identifier", delete(invalidate_edition))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
