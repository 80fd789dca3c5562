//! JSON API over the post repository
//!
//! Routes mirror the pages of the blog front end:
//!
//! - `GET /api/posts`: published listing
//! - `GET /api/posts/:slug`: one published post with rendered HTML
//! - `GET /api/tags/:tag`: published posts carrying a tag
//! - `GET /api/preview`: dashboard of drafts, scheduled and published posts
//! - `GET /api/preview/:slug`: any post, whatever its status
//!
//! The preview routes are not protected.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::cache::CachedRepository;
use crate::content::{MarkdownRenderer, Post, PostStatus, PreviewSummary};
use crate::Blog;

/// Server state
pub struct AppState {
    posts: CachedRepository,
    renderer: MarkdownRenderer,
}

impl AppState {
    pub fn new(posts: CachedRepository) -> Self {
        Self {
            posts,
            renderer: MarkdownRenderer::new(),
        }
    }
}

/// Listing entry: everything but the body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub author: String,
    pub tags: Vec<String>,
    pub reading_time: usize,
    pub image: Option<String>,
    pub image_alt: String,
    pub status: PostStatus,
}

impl PostSummary {
    fn new(post: &Post, now: DateTime<Utc>) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            description: post.description.clone(),
            date: post.date.clone(),
            author: post.author.clone(),
            tags: post.tags.clone(),
            reading_time: post.reading_time,
            image: post.image.clone(),
            image_alt: post.image_alt.clone(),
            status: post.status(now),
        }
    }
}

/// A full post with its body rendered to HTML
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub status: PostStatus,
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewCounts {
    pub drafts: usize,
    pub scheduled: usize,
    pub published: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewResponse {
    pub counts: PreviewCounts,
    pub drafts: Vec<PostSummary>,
    pub scheduled: Vec<PostSummary>,
    pub published: Vec<PostSummary>,
}

impl PreviewResponse {
    fn new(summary: &PreviewSummary, now: DateTime<Utc>) -> Self {
        Self {
            counts: PreviewCounts {
                drafts: summary.drafts.len(),
                scheduled: summary.scheduled.len(),
                published: summary.published.len(),
            },
            drafts: summarize(&summary.drafts, now),
            scheduled: summarize(&summary.scheduled, now),
            published: summarize(&summary.published, now),
        }
    }
}

fn summarize(posts: &[Post], now: DateTime<Utc>) -> Vec<PostSummary> {
    posts.iter().map(|post| PostSummary::new(post, now)).collect()
}

/// Build the API router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/:slug", get(get_post))
        .route("/api/tags/:tag", get(list_posts_by_tag))
        .route("/api/preview", get(preview))
        .route("/api/preview/:slug", get(preview_post))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the API server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new(blog.cached_repository()));
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("{} running at http://{}:{}", blog.config.title, ip, port);
    println!("Serving posts from {:?}", blog.content_dir);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

/// Run a repository query on the blocking pool; file reads are synchronous
async fn query<T, F>(state: &Arc<AppState>, f: F) -> Result<T, StatusCode>
where
    F: FnOnce(&AppState, DateTime<Utc>) -> T + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state, Utc::now()))
        .await
        .map_err(|e| {
            tracing::error!("Post query failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

async fn list_posts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PostSummary>>, StatusCode> {
    let posts = query(&state, |state, now| {
        summarize(&state.posts.list_posts(false, now), now)
    })
    .await?;
    Ok(Json(posts))
}

async fn list_posts_by_tag(
    State(state): State<Arc<AppState>>,
    Path(tag): Path<String>,
) -> Result<Json<Vec<PostSummary>>, StatusCode> {
    let posts = query(&state, move |state, now| {
        summarize(&state.posts.list_posts_by_tag(&tag, now), now)
    })
    .await?;
    Ok(Json(posts))
}

async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<PostDetail>, StatusCode> {
    let detail = query(&state, move |state, now| {
        state
            .posts
            .get_by_slug(&slug, now)
            .filter(|post| post.is_published(now))
            .map(|post| post_detail(state, post, now))
    })
    .await?;
    detail.map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn preview(State(state): State<Arc<AppState>>) -> Result<Json<PreviewResponse>, StatusCode> {
    let response = query(&state, |state, now| {
        PreviewResponse::new(&state.posts.preview(now), now)
    })
    .await?;
    Ok(Json(response))
}

async fn preview_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<PostDetail>, StatusCode> {
    let detail = query(&state, move |state, now| {
        state
            .posts
            .get_by_slug(&slug, now)
            .map(|post| post_detail(state, post, now))
    })
    .await?;
    detail.map(Json).ok_or(StatusCode::NOT_FOUND)
}

fn post_detail(state: &AppState, post: Post, now: DateTime<Utc>) -> PostDetail {
    let html = post.render_html(&state.renderer);
    PostDetail {
        status: post.status(now),
        post,
        html,
    }
}
