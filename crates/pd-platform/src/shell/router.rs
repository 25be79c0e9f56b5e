//! Shell Router
//!
//! Builds the axum router from the static route table. Every protected
//! route evaluates its guard against the resolver's current session; the
//! root route runs the role dispatcher behind an any-identified gate.

use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect as HttpRedirect, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use pd_access::{
    dispatch, evaluate, GateDecision, RoleLandingTable, RouteGuardSpec, RouteTable,
    SessionResolver, ROOT_PATH, UNAUTHORIZED_PATH,
};

use crate::identity::HostedIdentityProvider;
use crate::shared::error::PlatformError;

use super::nav::PageNavigation;
use super::pages;

/// Shared state for the shell handlers.
#[derive(Clone)]
pub struct ShellState {
    pub resolver: Arc<SessionResolver>,
    pub identity: Arc<HostedIdentityProvider>,
    pub landing: Arc<RoleLandingTable>,
    pub table: Arc<RouteTable>,
    pub dev_mode: bool,
}

#[derive(Debug, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

/// Build the shell router from the route table.
pub fn shell_router(state: ShellState) -> Router {
    let table = state.table.clone();

    let mut router = Router::new()
        .route(pd_access::LOGIN_PATH, get(login_form).post(sign_in))
        .route("/signout", post(sign_out))
        .route(UNAUTHORIZED_PATH, get(unauthorized));

    for entry in table.protected() {
        if entry.path == ROOT_PATH {
            router = router.route(ROOT_PATH, get(root_dispatcher));
            continue;
        }

        let guard = entry.guard.clone();
        let path = entry.path;
        router = router.route(
            path,
            get(move |State(state): State<ShellState>| {
                let guard = guard.clone();
                async move { guarded_page(&state, path, &guard) }
            }),
        );
    }

    for (from, to) in table.legacy_redirects() {
        let to = *to;
        router = router.route(from, get(move || async move { HttpRedirect::to(to) }));
    }

    router
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Evaluate a route guard and map the decision onto the response.
fn guarded_page(state: &ShellState, path: &str, guard: &RouteGuardSpec) -> Response {
    let session = state.resolver.current();
    let decision = evaluate(&session, guard);
    if state.dev_mode {
        debug!(path, ?decision, "gate evaluated");
    }
    decision.apply(&PageNavigation::page(pages::page_for(path)))
}

/// Root route: any-identified gate, then role dispatch.
async fn root_dispatcher(State(state): State<ShellState>) -> Response {
    let session = state.resolver.current();
    let guard = state
        .table
        .guard_for(ROOT_PATH)
        .cloned()
        .unwrap_or_else(RouteGuardSpec::any_identified);

    match evaluate(&session, &guard) {
        GateDecision::Allow => dispatch(&session, &state.landing).apply(&PageNavigation::none()),
        decision => decision.apply(&PageNavigation::none()),
    }
}

async fn login_form() -> Html<String> {
    Html(pages::login_page(None))
}

async fn sign_in(State(state): State<ShellState>, Form(form): Form<SignInForm>) -> Response {
    match state.identity.sign_in(&form.email, &form.password).await {
        Ok(()) => HttpRedirect::to(ROOT_PATH).into_response(),
        Err(PlatformError::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            Html(pages::login_page(Some("Invalid email or password"))),
        )
            .into_response(),
        Err(error) => {
            warn!(%error, "sign-in failed");
            error.into_response()
        }
    }
}

async fn sign_out(State(state): State<ShellState>) -> Response {
    if let Err(error) = state.identity.sign_out().await {
        warn!(%error, "sign-out failed");
    }
    HttpRedirect::to(pd_access::LOGIN_PATH).into_response()
}

async fn unauthorized() -> Html<String> {
    Html(pages::unauthorized_page())
}

async fn not_found() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html(pages::not_found_page()))
}
