//! Defines the route handler for the page to display when a route is not found.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// The fallback handler for unknown routes.
pub async fn get_404_not_found() -> Response {
    let page = error_view(
        "Not Found",
        "404",
        "Something's missing.",
        "Sorry, we can't find that page. You'll find the ledger on the home page.",
    );

    (StatusCode::NOT_FOUND, Html(page.into_string())).into_response()
}
