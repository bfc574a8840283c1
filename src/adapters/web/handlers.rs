//! HTTP request handlers for web adapter.

use askama::Template;
use axum::{
    Form,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use crate::domain::session::{Credentials, LoginOutcome};
use crate::domain::stats::TradeStats;
use crate::domain::trade::TradeRecord;
use crate::domain::trade_views::trade_views;
use crate::ports::credential_port::CredentialStore;

use super::auth::SessionCredentials;
use super::templates::{
    DashboardTemplate, LoginTemplate, SummaryView, TradeListTemplate, TradePanelTemplate,
};
use super::{AppState, WebError, is_history_restore, is_htmx_request};

pub const LOGIN_RETRY: &str = "Login failed. Try again.";

#[derive(Debug, serde::Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct DashboardQuery {
    pub tab: Option<String>,
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, WebError> {
    let Some(key) = SessionCredentials::new(session).load().await? else {
        // HTMX follows redirects inside the swap target; make it navigate instead.
        if is_htmx_request(&headers) {
            return Ok((StatusCode::OK, [("HX-Redirect", "/login")]).into_response());
        }
        return Ok(Redirect::to("/login").into_response());
    };

    let trades = match state.trade_port.fetch_trades(&key).await {
        Ok(trades) => trades,
        Err(e) => {
            tracing::error!("error fetching trades: {e}");
            Vec::new()
        }
    };

    let policy = state.config.aggregation;
    let mut views = trade_views(&state.config.default_tab, policy, render_trade_list);
    if let Some(tab) = query.tab.filter(|t| !t.is_empty()) {
        views.select(tab);
    }

    let content = views.render(&trades).transpose()?.unwrap_or_default();
    let panel = TradePanelTemplate {
        tabs: views.tabs(),
        content: &content,
    }
    .render()?;

    // Same URL serves both shapes, so caches must key on HX-Request.
    let vary = [(header::VARY, "HX-Request")];
    if is_htmx_request(&headers) && !is_history_restore(&headers) {
        return Ok((vary, Html(panel)).into_response());
    }

    let stats = TradeStats::compute(&trades, &policy);
    let page = DashboardTemplate {
        summary: SummaryView::from_stats(&stats),
        panel: &panel,
    }
    .render()?;
    Ok((vary, Html(page)).into_response())
}

fn render_trade_list(trades: &[&TradeRecord]) -> Result<String, askama::Error> {
    TradeListTemplate::new(trades).render()
}

pub async fn login_form(session: Session) -> Result<Response, WebError> {
    if SessionCredentials::new(session).load().await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    login_page(StatusCode::OK, "", None)
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    let credentials = Credentials {
        email: form.email,
        password: form.password,
    };

    match state.trade_port.login(&credentials).await {
        Ok(LoginOutcome::Accepted(key)) => {
            SessionCredentials::new(session).store(&key).await?;
            tracing::info!(email = %credentials.email, "login accepted");
            Ok(Redirect::to("/").into_response())
        }
        Ok(LoginOutcome::Rejected { reason }) => {
            tracing::warn!(email = %credentials.email, %reason, "login rejected");
            login_page(StatusCode::UNAUTHORIZED, &credentials.email, Some(&reason))
        }
        Err(e) => {
            tracing::error!("login error: {e}");
            login_page(
                StatusCode::BAD_GATEWAY,
                &credentials.email,
                Some(LOGIN_RETRY),
            )
        }
    }
}

fn login_page(status: StatusCode, email: &str, error: Option<&str>) -> Result<Response, WebError> {
    let html = LoginTemplate { email, error }.render()?;
    Ok((status, Html(html)).into_response())
}

pub async fn logout(session: Session) -> Result<Response, WebError> {
    SessionCredentials::new(session).clear().await?;
    Ok(Redirect::to("/login").into_response())
}

pub async fn not_found() -> WebError {
    WebError::not_found("Page not found")
}
