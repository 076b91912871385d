//! Handlers not linked to a specific integration

use ntex::web;
use serde_json::json;

/// Liveness check
#[web::get("/health")]
pub async fn health() -> Result<impl web::Responder, web::Error> {
    Ok(web::HttpResponse::Ok().json(&json!({ "status": "ok" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntex::{http, web::test};

    #[ntex::test]
    async fn test_health() {
        let app = test::init_service(web::App::new().service(health)).await;

        let req = test::TestRequest::with_uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), http::StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_slice(&test::read_body(resp).await).unwrap();
        assert_eq!(body, json!({"status": "ok"}));
    }
}
