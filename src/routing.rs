//! Application router configuration for the JSON API and the dashboard page.

use axum::{
    Router,
    http::Method,
    response::Redirect,
    routing::get,
};
use tower_http::cors::{AllowHeaders, Any, CorsLayer};

use crate::{
    AppState,
    dashboard::get_dashboard_page,
    endpoints,
    not_found::get_404_not_found,
    product::get_transactions_endpoint,
    seed::initialize_endpoint,
    statistics::{
        get_bar_chart_endpoint, get_combined_data_endpoint, get_pie_chart_endpoint,
        get_statistics_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    // The JSON API is read by a frontend served from another origin.
    let cors = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_origin(Any);

    let api_routes = Router::new()
        .route(endpoints::INITIALIZE, get(initialize_endpoint))
        .route(endpoints::TRANSACTIONS, get(get_transactions_endpoint))
        .route(endpoints::STATISTICS, get(get_statistics_endpoint))
        .route(endpoints::BAR_CHART, get(get_bar_chart_endpoint))
        .route(endpoints::PIE_CHART, get(get_pie_chart_endpoint))
        .route(endpoints::COMBINED_DATA, get(get_combined_data_endpoint))
        .layer(cors);

    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page));

    page_routes
        .merge(api_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::{HeaderValue, StatusCode, header};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{AppState, PaginationConfig, endpoints, seed::DEFAULT_SEED_URL};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let conn = Connection::open_in_memory().unwrap();
        let state = AppState::new(conn, DEFAULT_SEED_URL, PaginationConfig::default())
            .expect("Could not create app state.");

        TestServer::new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        let response = server.get("/does-not-exist").await;

        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_text("Not found");
    }

    #[tokio::test]
    async fn api_allows_any_origin() {
        let server = get_test_server();

        let response = server
            .get(endpoints::STATISTICS)
            .add_query_param("month", "March")
            .add_header("Origin", "http://localhost:5173")
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("*"))
        );
    }

    #[tokio::test]
    async fn routes_serve_empty_database() {
        let server = get_test_server();

        server
            .get(endpoints::TRANSACTIONS)
            .await
            .assert_json(&serde_json::json!([]));
        server
            .get(endpoints::PIE_CHART)
            .add_query_param("month", "March")
            .await
            .assert_json(&serde_json::json!([]));
        server
            .get(endpoints::DASHBOARD_VIEW)
            .await
            .assert_status_ok();
    }
}
