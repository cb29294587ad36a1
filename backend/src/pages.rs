//! Page Rendering
//!
//! HTML pages are plain template renders; the quiz page also receives the
//! question list. Static assets are served from a directory on disk.

use crate::api::AppState;
use crate::error::ApiError;
use crate::guidance::quiz::question_prompts;
use actix_web::{web, HttpResponse};
use log::debug;
use minijinja::{context, Environment, Value};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Template environment rooted at a directory
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new(template_dir: &Path) -> Self {
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(template_dir));
        Self { env }
    }

    pub fn render(&self, name: &str, ctx: Value) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn render_page(data: &AppState, name: &str, ctx: Value) -> Result<HttpResponse, ApiError> {
    let body = data.pages.render(name, ctx)?;
    Ok(html(body))
}

// ============================================================
// PAGE HANDLERS
// ============================================================

pub async fn home(data: web::Data<Arc<AppState>>) -> Result<HttpResponse, ApiError> {
    render_page(&data, "index.html", context! {})
}

pub async fn mapping(data: web::Data<Arc<AppState>>) -> Result<HttpResponse, ApiError> {
    render_page(&data, "mapping.html", context! {})
}

pub async fn bot(data: web::Data<Arc<AppState>>) -> Result<HttpResponse, ApiError> {
    render_page(&data, "bot.html", context! {})
}

pub async fn college_map(data: web::Data<Arc<AppState>>) -> Result<HttpResponse, ApiError> {
    render_page(&data, "college_map.html", context! {})
}

pub async fn mentor(data: web::Data<Arc<AppState>>) -> Result<HttpResponse, ApiError> {
    render_page(&data, "mentor.html", context! {})
}

/// Quiz page with the questions embedded
pub async fn quiz(data: web::Data<Arc<AppState>>) -> Result<HttpResponse, ApiError> {
    render_page(
        &data,
        "quiz.html",
        context! { questions_json => question_prompts() },
    )
}

// ============================================================
// STATIC FILES
// ============================================================

/// Resolve a request path inside `root`, refusing anything that escapes it
pub fn resolve_static(root: &Path, requested: &str) -> Option<PathBuf> {
    let relative = Path::new(requested);
    let mut resolved = root.to_path_buf();
    let mut has_file = false;
    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                has_file = true;
            }
            Component::CurDir => {}
            _ => return None,
        }
    }
    has_file.then_some(resolved)
}

pub async fn static_file(
    data: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let requested = path.into_inner();
    let file = resolve_static(&data.static_dir, &requested).ok_or(ApiError::NotFound)?;

    let bytes = match tokio::fs::read(&file).await {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Static file {} unavailable: {}", file.display(), e);
            return Err(ApiError::NotFound);
        }
    };

    let mime = mime_guess::from_path(&file).first_or_octet_stream();
    Ok(HttpResponse::Ok().content_type(mime.to_string()).body(bytes))
}
