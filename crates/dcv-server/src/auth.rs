use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::TokenConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::AppState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Reader,
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub role: Role,
}

impl Identity {
    pub fn reader(name: impl Into<String>) -> Self {
        Self { name: name.into(), role: Role::Reader }
    }

    pub fn admin(name: impl Into<String>) -> Self {
        Self { name: name.into(), role: Role::Admin }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    Anonymous,
}

impl Credentials {
    /// Read an `Authorization` header value. Both `Bearer <token>` and a
    /// bare token are accepted.
    pub fn from_header(value: Option<&str>) -> Self {
        let token = match value {
            Some(v) => v.strip_prefix("Bearer ").unwrap_or(v).trim(),
            None => "",
        };
        if token.is_empty() {
            Self::Anonymous
        } else {
            Self::Bearer(token.to_string())
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Read,
    Upload,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Upload => write!(f, "upload"),
        }
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Identity>;
    async fn authorize(&self, identity: &Identity, action: &Action) -> ServerResult<bool>;
}

/// Token table loaded from configuration.
///
/// Any known identity may read; only admins may upload.
#[derive(Default)]
pub struct StaticTokenAuth {
    tokens: HashMap<String, Identity>,
}

impl StaticTokenAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(tokens: &[TokenConfig]) -> Self {
        tokens.iter().fold(Self::new(), |auth, t| {
            auth.with_token(
                t.token.clone(),
                Identity {
                    name: t.name.clone(),
                    role: t.role,
                },
            )
        })
    }

    pub fn with_token(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.insert(token.into(), identity);
        self
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Debug for StaticTokenAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // never print the tokens themselves
        f.debug_struct("StaticTokenAuth")
            .field("token_count", &self.tokens.len())
            .finish()
    }
}

#[async_trait]
impl AuthProvider for StaticTokenAuth {
    async fn authenticate(&self, credentials: &Credentials) -> ServerResult<Identity> {
        match credentials {
            Credentials::Anonymous => Err(ServerError::Unauthorized),
            Credentials::Bearer(token) => self
                .tokens
                .get(token)
                .cloned()
                .ok_or(ServerError::InvalidToken),
        }
    }

    async fn authorize(&self, identity: &Identity, action: &Action) -> ServerResult<bool> {
        Ok(match action {
            Action::Read => true,
            Action::Upload => identity.is_admin(),
        })
    }
}

/// Middleware: authenticate the request and attach its [`Identity`].
pub async fn require_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let credentials = Credentials::from_header(header);

    let identity = match state.auth.authenticate(&credentials).await {
        Ok(identity) => identity,
        Err(e) => {
            warn!(path = %req.uri().path(), error = %e, "request rejected");
            return Err(e);
        }
    };
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// Fail with [`ServerError::Forbidden`] unless `identity` may perform `action`.
pub async fn ensure_allowed(
    auth: &dyn AuthProvider,
    identity: &Identity,
    action: Action,
) -> ServerResult<()> {
    if auth.authorize(identity, &action).await? {
        Ok(())
    } else {
        warn!(identity = %identity.name, %action, "permission denied");
        Err(ServerError::Forbidden {
            identity: identity.name.clone(),
            action: action.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> StaticTokenAuth {
        StaticTokenAuth::new()
            .with_token("admin-secret", Identity::admin("alice"))
            .with_token("reader-secret", Identity::reader("bob"))
    }

    #[test]
    fn credentials_from_header() {
        assert_eq!(
            Credentials::from_header(Some("Bearer abc")),
            Credentials::Bearer("abc".into())
        );
        assert_eq!(Credentials::from_header(Some("abc")), Credentials::Bearer("abc".into()));
        assert_eq!(Credentials::from_header(Some("")), Credentials::Anonymous);
        assert_eq!(Credentials::from_header(Some("Bearer ")), Credentials::Anonymous);
        assert_eq!(Credentials::from_header(None), Credentials::Anonymous);
    }

    #[test]
    fn action_display() {
        assert_eq!(Action::Read.to_string(), "read");
        assert_eq!(Action::Upload.to_string(), "upload");
    }

    #[test]
    fn from_config_builds_identities() {
        let auth = StaticTokenAuth::from_config(&[TokenConfig {
            token: "t".into(),
            name: "carol".into(),
            role: Role::Reader,
        }]);
        assert_eq!(auth.len(), 1);
        assert!(!format!("{auth:?}").contains("\"t\""));
    }

    #[tokio::test]
    async fn known_tokens_authenticate() {
        let auth = auth();
        let id = auth
            .authenticate(&Credentials::Bearer("admin-secret".into()))
            .await
            .unwrap();
        assert_eq!(id, Identity::admin("alice"));
    }

    #[tokio::test]
    async fn missing_and_unknown_tokens_fail() {
        let auth = auth();
        assert!(matches!(
            auth.authenticate(&Credentials::Anonymous).await,
            Err(ServerError::Unauthorized)
        ));
        assert!(matches!(
            auth.authenticate(&Credentials::Bearer("valid-token".into())).await,
            Err(ServerError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn only_admins_upload() {
        let auth = auth();
        let reader = Identity::reader("bob");
        assert!(auth.authorize(&reader, &Action::Read).await.unwrap());
        assert!(!auth.authorize(&reader, &Action::Upload).await.unwrap());
        assert!(auth.authorize(&Identity::admin("alice"), &Action::Upload).await.unwrap());

        let err = ensure_allowed(&auth, &reader, Action::Upload).await.unwrap_err();
        assert!(matches!(err, ServerError::Forbidden { .. }));
    }
}
