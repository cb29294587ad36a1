//! Web API Module
//!
//! Routes for the career guidance site: rendered pages, the quiz
//! prediction endpoint and the mentor question endpoint.
//! All JSON endpoints require no authentication.

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::guidance::{self, model::error_chain, ModelStore, Recommendation, QUESTIONS};
use crate::llm::{AnswerProvider, LocalLlm};
use crate::pages::{self, PageRenderer};
use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use log::{error, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

// ============================================================
// APPLICATION STATE
// ============================================================

/// Shared application state
pub struct AppState {
    /// Lazily loaded classifier + label encoder
    pub models: ModelStore,
    pub pages: PageRenderer,
    pub static_dir: PathBuf,
    pub llm: Arc<dyn AnswerProvider>,
}

impl AppState {
    pub fn new(config: &ServerConfig, llm: Arc<dyn AnswerProvider>) -> Self {
        Self {
            models: ModelStore::new(config.artifact_paths()),
            pages: PageRenderer::new(&config.template_dir),
            static_dir: config.static_dir.clone(),
            llm,
        }
    }

    /// State backed by the local model server named in `config`
    pub fn from_config(config: &ServerConfig) -> Self {
        let llm = Arc::new(LocalLlm::new(config.llm.clone()));
        Self::new(config, llm)
    }
}

// ============================================================
// API REQUEST/RESPONSE TYPES
// ============================================================

#[derive(Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Serialize)]
pub struct AnswerResponse {
    pub answer: String,
}

// ============================================================
// API HANDLERS
// ============================================================

/// Health check endpoint
async fn health_check(data: web::Data<Arc<AppState>>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "Career Guidance API",
        "version": env!("CARGO_PKG_VERSION"),
        "models_loaded": data.models.is_loaded(),
    }))
}

/// Quiz questions with their dimensions
async fn list_questions() -> impl Responder {
    HttpResponse::Ok().json(&QUESTIONS[..])
}

/// Recommend a career category from quiz answers
async fn predict(
    data: web::Data<Arc<AppState>>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    // Artifact reads are blocking; only the first requests hit the disk
    let state = data.get_ref().clone();
    let models = web::block(move || state.models.ensure_loaded())
        .await
        .map_err(ApiError::internal)?
        .ok_or(ApiError::ModelsUnavailable)?;

    match run_prediction(&models, &body) {
        Ok(recommendation) => Ok(HttpResponse::Ok().json(recommendation)),
        Err(e) => {
            if let ApiError::Internal(_) = &e {
                error!("Error in /predict: {}", error_chain(&e));
            }
            Err(e)
        }
    }
}

fn run_prediction(models: &guidance::LoadedModels, body: &[u8]) -> Result<Recommendation, ApiError> {
    let payload: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::internal(format!("Failed to decode JSON object: {}", e)))?;
    let fields = payload
        .as_object()
        .ok_or_else(|| ApiError::internal("request body must be a JSON object"))?;

    let answers = guidance::decode_answers(fields.get("answers"))?;
    Ok(guidance::recommend(models, &answers)?)
}

/// Ask the mentor model a free-text question
async fn get_answer(
    data: web::Data<Arc<AppState>>,
    req: web::Json<AskRequest>,
) -> Result<HttpResponse, ApiError> {
    let answer = data.llm.get_response(req.question.as_deref()).await.map_err(|e| {
        error!("Error in /get_answer: {}", error_chain(&e));
        ApiError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(AnswerResponse { answer }))
}

// ============================================================
// SERVER CONFIGURATION
// ============================================================

/// Register every route; shared by the server and the tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into());

    cfg.app_data(json_config)
        .route("/", web::get().to(pages::home))
        .route("/mapping", web::get().to(pages::mapping))
        .route("/bot", web::get().to(pages::bot))
        .route("/college_map", web::get().to(pages::college_map))
        .route("/mentor", web::get().to(pages::mentor))
        .route("/quiz", web::get().to(pages::quiz))
        .route("/predict", web::post().to(predict))
        .route("/get_answer", web::post().to(get_answer))
        .route("/static/{filename:.*}", web::get().to(pages::static_file))
        .route("/api/questions", web::get().to(list_questions))
        .route("/health", web::get().to(health_check));
}

/// Configure and run the API server
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let state = Arc::new(AppState::from_config(&config));

    info!("Career Guidance API starting at http://{}:{}", config.host, config.port);
    info!("Model artifacts: {} / {}", config.model_path.display(), config.label_path.display());
    info!("Language model: {} at {}", config.llm.model, config.llm.base_url);
    info!("Endpoints:");
    info!("   GET  /, /mapping, /bot, /college_map, /mentor, /quiz");
    info!("   POST /predict           - Recommend a career category");
    info!("   POST /get_answer        - Ask the mentor model");
    info!("   GET  /api/questions     - Quiz questions");
    info!("   GET  /static/*          - Static assets");
    info!("   GET  /health            - Health check");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
