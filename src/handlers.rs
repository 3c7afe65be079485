use crate::error::PrompsterError;
use crate::models::{CopyRequest, CopyResponse, ErrorResponse, TreeQuery, TreeResponse};
use crate::workspace::Workspace;
use actix_web::error::InternalError;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use log::{debug, info, warn};
use rust_embed::RustEmbed;
use serde_json::json;
use std::time::Instant;

#[derive(RustEmbed)]
#[folder = "public/"]
struct Asset;

/// Routes shared by the server and the tests. The static fallback is
/// attached separately with `App::default_service`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        warn!("Rejected request body: {}", message);
        InternalError::from_response(err, HttpResponse::BadRequest().json(ErrorResponse::new(message)))
            .into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        warn!("Rejected query string: {}", message);
        InternalError::from_response(err, HttpResponse::BadRequest().json(ErrorResponse::new(message)))
            .into()
    }))
    .service(health)
    .service(get_tree)
    .service(copy_selection);
}

#[get("/api/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": true, "message": "Prompster is running" }))
}

#[get("/api/tree")]
pub async fn get_tree(
    workspace: web::Data<Workspace>,
    query: web::Query<TreeQuery>,
) -> Result<HttpResponse, PrompsterError> {
    let TreeQuery { path, depth } = query.into_inner();
    let requested = path.unwrap_or_default();
    info!("Received tree request for '{}' (depth {:?})", requested, depth);
    let start_time = Instant::now();

    let ws = workspace.clone();
    let tree = web::block(move || ws.list_tree(&requested, depth))
        .await?
        .map_err(|e| {
            warn!("Tree request failed: {}", e);
            e
        })?;

    info!("Built tree '{}' in {:.2?}.", tree.path, start_time.elapsed());
    Ok(HttpResponse::Ok().json(TreeResponse {
        success: true,
        root: workspace.root_name(),
        tree,
    }))
}

#[post("/api/copy")]
pub async fn copy_selection(
    workspace: web::Data<Workspace>,
    req: web::Json<CopyRequest>,
) -> Result<HttpResponse, PrompsterError> {
    let request = req.into_inner();
    info!(
        "Received copy request for {} paths ({} excluded).",
        request.paths.len(),
        request.exclude.len()
    );
    let start_time = Instant::now();

    let document = web::block(move || workspace.aggregate(&request))
        .await?
        .map_err(|e| {
            warn!("Copy request rejected: {}", e);
            e
        })?;

    info!(
        "Aggregated {} files ({} characters) in {:.2?}.",
        document.stats.files,
        document.stats.characters,
        start_time.elapsed()
    );
    Ok(HttpResponse::Ok().json(CopyResponse {
        success: true,
        document,
    }))
}

pub async fn static_handler(req: HttpRequest) -> HttpResponse {
    let path = req.path().trim_start_matches('/');
    let path = if path.is_empty() { "index.html" } else { path };
    debug!("Serving static asset: {}", path);

    match Asset::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(content.data.into_owned())
        }
        None => HttpResponse::NotFound().body("404 Not Found"),
    }
}
