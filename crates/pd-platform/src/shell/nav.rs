//! HTTP Navigation Surface
//!
//! Maps gate and dispatch decisions onto axum responses. Exactly one
//! surface operation runs per evaluation; the decision itself stays pure.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect as HttpRedirect, Response},
};

use pd_access::NavigationSurface;

use super::pages;

/// Navigation surface for one request. Carries the page body to render on
/// `Allow`; dispatch-only callers leave it empty.
pub struct PageNavigation {
    body: Option<String>,
}

impl PageNavigation {
    pub fn page(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
        }
    }

    /// For the root dispatcher, which never renders children of its own.
    pub fn none() -> Self {
        Self { body: None }
    }
}

impl NavigationSurface for PageNavigation {
    type Output = Response;

    /// 303 re-navigates without caching the protected URL; the browser does
    /// not offer the denied page on back-navigation.
    fn redirect(&self, to: &str, _replace: bool) -> Response {
        HttpRedirect::to(to).into_response()
    }

    fn render_children(&self) -> Response {
        match &self.body {
            Some(body) => Html(body.clone()).into_response(),
            None => StatusCode::NO_CONTENT.into_response(),
        }
    }

    fn render_pending(&self) -> Response {
        (
            [(header::CACHE_CONTROL, "no-store")],
            Html(pages::loading_page()),
        )
            .into_response()
    }
}
