use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and the model in use.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "loyalty-program-design",
        "model": state.llm.model_name(),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::llm_client::stub::StubModel;
    use crate::routes::build_router;
    use crate::state::AppState;

    #[tokio::test]
    async fn test_health_reports_ok() {
        let config = Config::from_lookup(|key| {
            (key == "OPENAI_API_KEY").then(|| "sk-test".to_string())
        })
        .unwrap();
        let app = build_router(AppState {
            config,
            llm: Arc::new(StubModel::replying("")),
        });

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["model"], "stub");
    }
}
