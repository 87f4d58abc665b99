//! Per-request caller identity
//!
//! The authentication gateway in front of the server verifies tokens and
//! forwards the caller as trusted headers. [`CallContext`] captures what
//! those headers say, including a resolution failure, and is passed
//! explicitly into every audited service call.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use std::convert::Infallible;

use crate::error::AppError;

/// Caller email forwarded by the gateway
pub const USER_EMAIL_HEADER: &str = "x-user-email";

/// Comma-separated caller roles forwarded by the gateway
pub const USER_ROLES_HEADER: &str = "x-user-roles";

pub const ADMIN_ROLE: &str = "ADMIN";

/// An authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub email: String,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn new(email: impl Into<String>, roles: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        Self {
            email: email.into(),
            roles: roles.into_iter().filter_map(|r| normalize_role(r.as_ref())).collect(),
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        normalize_role(role).is_some_and(|role| self.roles.contains(&role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }
}

/// `" role_admin "` -> `"ADMIN"`
fn normalize_role(role: &str) -> Option<String> {
    let role = role.trim().to_uppercase();
    let role = role.strip_prefix("ROLE_").unwrap_or(&role).to_string();
    (!role.is_empty()).then_some(role)
}

/// Why the caller identity could not be determined
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    #[error("header '{0}' is not valid visible ASCII")]
    InvalidHeader(&'static str),

    #[error("header '{0}' is present but blank")]
    BlankHeader(&'static str),
}

/// Explicit caller context for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallContext {
    identity: Result<Option<Principal>, IdentityError>,
}

impl Default for CallContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl CallContext {
    /// No caller identity
    pub fn anonymous() -> Self {
        Self { identity: Ok(None) }
    }

    pub fn authenticated(principal: Principal) -> Self {
        Self {
            identity: Ok(Some(principal)),
        }
    }

    /// A caller whose identity could not be resolved
    pub fn unresolvable(error: IdentityError) -> Self {
        Self { identity: Err(error) }
    }

    /// Read the gateway identity headers
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let Some(email) = headers.get(USER_EMAIL_HEADER) else {
            return Self::anonymous();
        };

        let email = match email.to_str() {
            Ok(email) => email.trim(),
            Err(_) => return Self::unresolvable(IdentityError::InvalidHeader(USER_EMAIL_HEADER)),
        };
        if email.is_empty() {
            return Self::unresolvable(IdentityError::BlankHeader(USER_EMAIL_HEADER));
        }

        let roles = match headers.get(USER_ROLES_HEADER).map(|v| v.to_str()) {
            None => "",
            Some(Ok(roles)) => roles,
            Some(Err(_)) => {
                return Self::unresolvable(IdentityError::InvalidHeader(USER_ROLES_HEADER))
            },
        };

        Self::authenticated(Principal::new(email, roles.split(',')))
    }

    pub fn principal(&self) -> Result<Option<&Principal>, IdentityError> {
        match &self.identity {
            Ok(principal) => Ok(principal.as_ref()),
            Err(e) => Err(e.clone()),
        }
    }

    /// The identity to attribute an action to, if any
    pub fn resolve_actor(&self) -> Result<Option<&str>, IdentityError> {
        Ok(self.principal()?.map(|p| p.email.as_str()))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CallContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// Extractor that only admits callers holding the `ADMIN` role
///
/// Rejects with 401 when there is no usable identity and 403 when the caller
/// is not an administrator, before the handler body runs.
#[derive(Debug, Clone)]
pub struct AdminCaller(pub Principal);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminCaller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let context = CallContext::from_headers(&parts.headers);

        match context.principal() {
            Ok(Some(principal)) if principal.is_admin() => Ok(Self(principal.clone())),
            Ok(Some(principal)) => Err(AppError::Forbidden(format!(
                "User '{}' is not allowed to read audit logs",
                principal.email
            ))),
            Ok(None) => Err(AppError::Unauthorized("Authentication required".to_string())),
            Err(e) => Err(AppError::Unauthorized(e.to_string())),
        }
    }
}
