use actix_web::{HttpResponse, Responder, web};

use crate::AppState;

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health_check)));
    cfg.service(web::resource("/api/version").route(web::get().to(get_version)));
    cfg.service(web::resource("/api/test-db").route(web::get().to(test_db)));
}

async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": VERSION,
        "uptime_secs": state.started_at.elapsed().as_secs(),
        "database_connected": state.connector.is_connected()
    }))
}

async fn get_version() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "version": VERSION
    }))
}

/// Open the database if needed and run a trivial query against it
async fn test_db(state: web::Data<AppState>) -> impl Responder {
    match state.connector.connect().and_then(|db| db.ping()) {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Database connection successful"
        })),
        Err(e) => {
            log::error!("[DB] Connection check failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "message": "Database connection failed",
                "error": e.to_string()
            }))
        }
    }
}
