use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{Principal, Role};
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(String),
}

/// Required capability for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleGate {
    /// Exactly this role
    Only(Role),
    /// Any of the listed roles
    AnyOf(&'static [Role]),
}

impl RoleGate {
    pub const ADMIN: RoleGate = RoleGate::Only(Role::Admin);
    pub const STAFF: RoleGate = RoleGate::AnyOf(&[Role::Admin, Role::Seller]);
    pub const ANY_ROLE: RoleGate = RoleGate::AnyOf(Role::ALL);

    pub fn authorize(&self, principal: &Principal) -> Decision {
        authorize(principal, self.roles())
    }

    fn roles(&self) -> &[Role] {
        match self {
            RoleGate::Only(role) => std::slice::from_ref(role),
            RoleGate::AnyOf(roles) => roles,
        }
    }
}

/// Allow the principal only if its role is one of `required`
pub fn authorize(principal: &Principal, required: &[Role]) -> Decision {
    if required.contains(&principal.role) {
        Decision::Allow
    } else {
        let names: Vec<&str> = required.iter().map(Role::as_str).collect();
        Decision::Deny(format!("Role '{}' is not permitted, requires one of [{}]", principal.role, names.join(", ")))
    }
}

/// Role check middleware; runs after `jwt_auth_middleware` has attached a principal
pub async fn require_roles(
    State(gate): State<RoleGate>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = request
        .extensions()
        .get::<Principal>()
        .copied()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    match gate.authorize(&principal) {
        Decision::Allow => Ok(next.run(request).await),
        Decision::Deny(reason) => {
            tracing::warn!(
                "Denied {} {} for user {}: {}",
                request.method(),
                request.uri().path(),
                principal.id,
                reason
            );
            Err(ApiError::forbidden(reason))
        }
    }
}
