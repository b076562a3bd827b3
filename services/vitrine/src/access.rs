//! Access gate for the dashboard view

use crate::session::Session;

/// Role required to pass the gate with an identity present
pub const ADMIN_ROLE: &str = "admin";

/// Outcome of the access check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Unauthenticated,
    Denied(String),
}

/// Decide whether the dashboard may render for this session.
///
/// Unauthenticated sessions fall through and execute the handler; only a
/// non-admin identity is denied.
pub fn authorize(session: &Session) -> AccessDecision {
    match &session.identity {
        None => AccessDecision::Unauthenticated,
        Some(identity) if identity.role == ADMIN_ROLE => AccessDecision::Allow,
        Some(identity) => {
            tracing::debug!(
                "Denying dashboard to '{}' with role '{}'",
                identity.username,
                identity.role
            );
            AccessDecision::Denied(
                "Você precisa ser um administrador para acessar o dashboard.".to_string(),
            )
        }
    }
}
