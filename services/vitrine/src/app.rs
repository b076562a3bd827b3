//! Application core: user actions in, view-models out.
//!
//! Handlers translate HTTP requests into `Action`s; `App::handle` runs the
//! access gate, loader, pagination and session mutation and returns a
//! `ViewModel` for the rendering layer. No HTTP types appear here, so the
//! whole flow is unit-testable without a server.

use crate::access::{authorize, AccessDecision};
use crate::auth::{authenticate, signup, Credentials};
use crate::backend::TableClient;
use crate::loader::DataLoader;
use crate::pagination::{clamp_page, page_count, paginate};
use crate::record::Record;
use crate::session::Session;

/// One user interaction
#[derive(Debug)]
pub enum Action {
    ShowLogin,
    LoginSubmit(Credentials),
    SignupSubmit(Credentials),
    ShowDashboard { page: usize },
    SelectItem { link: String, page: usize },
}

/// Login page content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginView {
    pub notice: Option<String>,
    pub warning: Option<String>,
}

/// Dashboard page content: one clamped page of cards plus the selection
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub page: usize,
    pub page_count: usize,
    pub cards: Vec<Record>,
    pub selected_link: Option<String>,
}

/// What the rendering layer shows next
#[derive(Debug, Clone, PartialEq)]
pub enum ViewModel {
    Login(LoginView),
    Dashboard(DashboardView),
    Denied { reason: String },
}

/// The application core, shared across sessions
pub struct App {
    auth_client: TableClient,
    users_table: String,
    loader: DataLoader,
    page_size: usize,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("users_table", &self.users_table)
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl App {
    pub fn new(
        auth_client: TableClient,
        users_table: &str,
        loader: DataLoader,
        page_size: usize,
    ) -> Self {
        Self {
            auth_client,
            users_table: users_table.to_string(),
            loader,
            page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Apply one action to the session context and produce the next view
    pub async fn handle(&self, session: &mut Session, action: Action) -> crate::Result<ViewModel> {
        match action {
            Action::ShowLogin => Ok(ViewModel::Login(LoginView::default())),
            Action::LoginSubmit(credentials) => self.login(session, &credentials).await,
            Action::SignupSubmit(credentials) => self.signup(session, &credentials).await,
            Action::ShowDashboard { page } => self.dashboard(session, page).await,
            Action::SelectItem { link, page } => {
                if let AccessDecision::Denied(reason) = authorize(session) {
                    return Ok(ViewModel::Denied { reason });
                }
                session.select(&link);
                self.dashboard(session, page).await
            }
        }
    }

    async fn login(&self, session: &mut Session, credentials: &Credentials) -> crate::Result<ViewModel> {
        match authenticate(&self.auth_client, &self.users_table, credentials).await? {
            Some(identity) => {
                session.identity = Some(identity);
                Ok(ViewModel::Login(LoginView {
                    notice: Some("Logado com sucesso!".to_string()),
                    warning: None,
                }))
            }
            None => Ok(ViewModel::Login(LoginView {
                notice: None,
                warning: Some("Usuário não autenticado.".to_string()),
            })),
        }
    }

    async fn signup(&self, session: &mut Session, credentials: &Credentials) -> crate::Result<ViewModel> {
        match signup(&self.auth_client, &self.users_table, credentials).await {
            Ok(identity) => {
                session.identity = Some(identity);
                Ok(ViewModel::Login(LoginView {
                    notice: Some("Cadastro realizado com sucesso!".to_string()),
                    warning: None,
                }))
            }
            Err(crate::VitrineError::Auth(message)) => Ok(ViewModel::Login(LoginView {
                notice: None,
                warning: Some(message),
            })),
            Err(e) => Err(e),
        }
    }

    async fn dashboard(&self, session: &Session, page: usize) -> crate::Result<ViewModel> {
        // Denied short-circuits before any data query
        if let AccessDecision::Denied(reason) = authorize(session) {
            return Ok(ViewModel::Denied { reason });
        }

        let records = self.loader.load().await?;
        let page = clamp_page(page, records.len(), self.page_size);
        let cards = paginate(&records, page, self.page_size).to_vec();

        Ok(ViewModel::Dashboard(DashboardView {
            page,
            page_count: page_count(records.len(), self.page_size),
            cards,
            selected_link: session.current().map(str::to_string),
        }))
    }
}
