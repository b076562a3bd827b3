//! HTTP surface: routes, session cookies, and HTML rendering

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::{Action, App, DashboardView, LoginView, ViewModel};
use crate::auth::Credentials;
use crate::config::GalleryConfig;
use crate::session::SessionStoreHandle;

const SESSION_COOKIE: &str = "sid";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub app: Arc<App>,
    pub sessions: SessionStoreHandle,
    pub gallery: GalleryConfig,
}

/// Build the axum router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(login_page_handler))
        .route("/login", post(login_submit_handler))
        .route("/signup", post(signup_submit_handler))
        .route("/dashboard", get(dashboard_handler))
        .route("/select", post(select_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct CredentialsForm {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct SelectForm {
    link: String,
    page: Option<usize>,
}

fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE {
            Uuid::parse_str(value).ok()
        } else {
            None
        }
    })
}

fn session_cookie(id: Uuid) -> String {
    format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, id)
}

fn page_response(id: Uuid, status: StatusCode, html: String) -> Response {
    (
        status,
        [(header::SET_COOKIE, session_cookie(id))],
        axum::response::Html(html),
    )
        .into_response()
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

async fn login_page_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    run_action(&state, &headers, Action::ShowLogin).await
}

async fn login_submit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let action = Action::LoginSubmit(Credentials {
        username: form.username,
        password: form.password,
    });
    run_action(&state, &headers, action).await
}

async fn signup_submit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CredentialsForm>,
) -> Response {
    let action = Action::SignupSubmit(Credentials {
        username: form.username,
        password: form.password,
    });
    run_action(&state, &headers, action).await
}

async fn dashboard_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Response {
    let action = Action::ShowDashboard {
        page: query.page.unwrap_or(1),
    };
    run_action(&state, &headers, action).await
}

/// POST /select records the selection, then redirects back to the dashboard
/// so a refresh does not resubmit the form.
async fn select_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SelectForm>,
) -> Response {
    let page = form.page.unwrap_or(1);
    let (id, mut session) = state.sessions.get_or_create(session_id(&headers)).await;
    let action = Action::SelectItem {
        link: form.link,
        page,
    };
    let result = state.app.handle(&mut session, action).await;
    state.sessions.put(id, session).await;

    match result {
        Ok(ViewModel::Denied { reason }) => {
            page_response(id, StatusCode::FORBIDDEN, render_denied(&reason))
        }
        Ok(_) => (
            [(header::SET_COOKIE, session_cookie(id))],
            Redirect::to(&format!("/dashboard?page={}", page)),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Select failed: {}", e);
            page_response(id, StatusCode::BAD_GATEWAY, render_error(&e.to_string()))
        }
    }
}

async fn run_action(state: &AppState, headers: &HeaderMap, action: Action) -> Response {
    let (id, mut session) = state.sessions.get_or_create(session_id(headers)).await;
    let result = state.app.handle(&mut session, action).await;
    state.sessions.put(id, session).await;

    match result {
        Ok(ViewModel::Login(login)) => page_response(id, StatusCode::OK, render_login(&login)),
        Ok(ViewModel::Dashboard(dashboard)) => page_response(
            id,
            StatusCode::OK,
            render_dashboard(&dashboard, &state.gallery),
        ),
        Ok(ViewModel::Denied { reason }) => {
            page_response(id, StatusCode::FORBIDDEN, render_denied(&reason))
        }
        Err(e) => {
            tracing::error!("Render cycle failed: {}", e);
            page_response(id, StatusCode::BAD_GATEWAY, render_error(&e.to_string()))
        }
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn page_shell(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
</head>
<body style="font-family: system-ui, sans-serif; max-width: 960px; margin: 0 auto; padding: 1rem;">
    <nav style="margin-bottom: 1rem; border-bottom: 1px solid #dee2e6; padding-bottom: 0.5rem;">
        <strong>Navegação:</strong>
        <a href="/" style="margin-left: 0.5rem;">Login/Cadastro</a>
        <a href="/dashboard" style="margin-left: 0.5rem;">Dashboard</a>
    </nav>
{body}
</body>
</html>"#
    )
}

fn render_login(login: &LoginView) -> String {
    let notice = login
        .notice
        .as_deref()
        .map(|text| {
            format!(
                r#"    <p style="color: #155724; background-color: #d4edda; padding: 0.5rem;">{}</p>"#,
                escape_html(text)
            )
        })
        .unwrap_or_default();
    let warning = login
        .warning
        .as_deref()
        .map(|text| {
            format!(
                r#"    <p style="color: #856404; background-color: #fff3cd; padding: 0.5rem;">{}</p>"#,
                escape_html(text)
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"    <h1>Login/Cadastro</h1>
{notice}
{warning}
    <section style="display: flex; gap: 2rem;">
        <form method="post" action="/login">
            <h2>Login</h2>
            <p><input name="username" placeholder="Usuário" required></p>
            <p><input name="password" type="password" placeholder="Senha" required></p>
            <p><button type="submit">Entrar</button></p>
        </form>
        <form method="post" action="/signup">
            <h2>Cadastro</h2>
            <p><input name="username" placeholder="Usuário" required></p>
            <p><input name="password" type="password" placeholder="Senha" required></p>
            <p><button type="submit">Cadastrar</button></p>
        </form>
    </section>"#
    );
    page_shell("Login/Cadastro", &body)
}

fn render_dashboard(dashboard: &DashboardView, gallery: &GalleryConfig) -> String {
    let cards: String = dashboard
        .cards
        .iter()
        .map(|record| {
            format!(
                r#"        <div style="border: 1px solid #dee2e6; border-radius: 0.25rem; padding: 0.75rem;">
            <p><strong>{nome}</strong></p>
            <p>{reacoes} reações</p>
            <p>Postado em: {data}</p>
            <form method="post" action="/select">
                <input type="hidden" name="link" value="{link}">
                <input type="hidden" name="page" value="{page}">
                <button type="submit">Ver projeto - {nome}</button>
            </form>
        </div>"#,
                nome = escape_html(&record.nome),
                reacoes = record.reacoes,
                data = escape_html(&record.data),
                link = escape_html(&record.link),
                page = dashboard.page,
            )
        })
        .collect();

    let selected = dashboard
        .selected_link
        .as_deref()
        .map(|link| {
            format!(
                r#"    <hr>
    <h2>Projeto selecionado:</h2>
    <iframe src="{}" height="{}" width="100%" style="border: 0;" scrolling="yes"></iframe>"#,
                escape_html(link),
                gallery.iframe_height
            )
        })
        .unwrap_or_default();

    let body = format!(
        r#"    <h1>Dashboard Alura Gemini</h1>
    <form method="get" action="/dashboard">
        <label>Página:
            <input type="number" name="page" min="1" max="{page_count}" value="{page}" step="1">
        </label>
        <button type="submit">Ir</button>
        <span>({page} de {page_count})</span>
    </form>
    <section style="display: grid; grid-template-columns: repeat({columns}, 1fr); gap: 1rem; margin-top: 1rem;">
{cards}
    </section>
{selected}"#,
        page_count = dashboard.page_count,
        page = dashboard.page,
        columns = gallery.columns,
        cards = cards,
        selected = selected,
    );
    page_shell("Dashboard Alura Gemini", &body)
}

fn render_denied(reason: &str) -> String {
    let body = format!(
        r#"    <h1>Dashboard Alura Gemini</h1>
    <p style="color: #721c24; background-color: #f8d7da; padding: 0.5rem;">{}</p>"#,
        escape_html(reason)
    );
    page_shell("Acesso negado", &body)
}

fn render_error(message: &str) -> String {
    let body = format!(
        r#"    <h1>Dashboard Alura Gemini</h1>
    <p style="color: #721c24; background-color: #f8d7da; padding: 0.5rem;">Falha ao carregar os dados: {}</p>
    <p>Tente novamente.</p>"#,
        escape_html(message)
    );
    page_shell("Erro", &body)
}
