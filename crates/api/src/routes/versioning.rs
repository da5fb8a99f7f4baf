//! Redirects for the unversioned referral endpoints.
//!
//! Clients built against `/api/referrals...` receive 301 Moved Permanently
//! pointing at the same resource under `/api/v1`.

use axum::{
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};

use crate::app::AppState;

/// Legacy paths, all answered by [`redirect_to_v1`] for any method.
pub fn legacy_router() -> Router<AppState> {
    Router::new()
        .route("/api/referrals", any(redirect_to_v1))
        .route("/api/referrals/:user_id", any(redirect_to_v1))
        .route("/api/referrals/resolve/:referral_code", any(redirect_to_v1))
}

/// Rewrites `/api/...` to `/api/v1/...`, keeping the query string.
pub async fn redirect_to_v1(uri: Uri) -> Response {
    let path = uri.path();

    let new_path = match path.strip_prefix("/api/") {
        Some(rest) => format!("/api/v1/{}", rest),
        None => format!("/api/v1{}", path.strip_prefix("/api").unwrap_or(path)),
    };

    let location = match uri.query() {
        Some(query) => format!("{}?{}", new_path, query),
        None => new_path,
    };

    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, location)],
        "Moved to versioned API",
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn location_for(uri: &str) -> String {
        let response = redirect_to_v1(uri.parse().unwrap()).await;
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        response.headers()[header::LOCATION]
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_redirect_collection() {
        assert_eq!(location_for("/api/referrals").await, "/api/v1/referrals");
    }

    #[tokio::test]
    async fn test_redirect_keeps_path_segments() {
        assert_eq!(
            location_for("/api/referrals/resolve/ABC123").await,
            "/api/v1/referrals/resolve/ABC123"
        );
        assert_eq!(
            location_for("/api/referrals/user-42").await,
            "/api/v1/referrals/user-42"
        );
    }

    #[tokio::test]
    async fn test_redirect_keeps_query() {
        assert_eq!(
            location_for("/api/referrals?verbose=1").await,
            "/api/v1/referrals?verbose=1"
        );
    }
}
