use serde::{Deserialize, Serialize};

/// The two capability sets of the application. Every authenticated identity
/// carries exactly one role; all route gating reduces to a check against it.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Tenant,
}

impl Role {
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Tenant => "tenant",
        }
    }

    #[must_use]
    pub const fn dashboard_path(self) -> &'static str {
        match self {
            Self::Owner => "/owner",
            Self::Tenant => "/tenant",
        }
    }

    #[must_use]
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        match segment {
            "owner" => Some(Self::Owner),
            "tenant" => Some(Self::Tenant),
            _ => None,
        }
    }
}

/// Outcome of evaluating a request path against the current session.
/// Produced once at the routing layer and consumed uniformly: the page router
/// turns redirects into HTTP redirects, the API gate turns them into
/// 401/403 responses carrying the same target location.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AccessDecision {
    Render,
    RedirectToLogin,
    RedirectToDashboard(Role),
}

/// Evaluates the access rules for a page path, in order:
/// public paths always render; unauthenticated sessions go to the login page;
/// the root path and wrong-role paths go to the role's dashboard.
#[must_use]
pub fn decide(path: &str, role: Option<Role>) -> AccessDecision {
    let segment = path.trim_start_matches('/').split('/').next().unwrap_or("");

    if matches!(segment, "login" | "verify") {
        return AccessDecision::Render;
    }

    let Some(role) = role else {
        return AccessDecision::RedirectToLogin;
    };

    if segment.is_empty() {
        return AccessDecision::RedirectToDashboard(role);
    }

    match Role::from_path_segment(segment) {
        Some(segment_role) if segment_role == role => AccessDecision::Render,
        _ => AccessDecision::RedirectToDashboard(role),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_page_renders_for_everyone() {
        assert_eq!(decide("/login", None), AccessDecision::Render);
        assert_eq!(decide("/login", Some(Role::Owner)), AccessDecision::Render);
        assert_eq!(decide("/verify", Some(Role::Tenant)), AccessDecision::Render);
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        assert_eq!(decide("/owner/rooms", None), AccessDecision::RedirectToLogin);
        assert_eq!(decide("/tenant", None), AccessDecision::RedirectToLogin);
        assert_eq!(decide("/", None), AccessDecision::RedirectToLogin);
    }

    #[test]
    fn test_root_redirects_to_role_dashboard() {
        assert_eq!(decide("/", Some(Role::Owner)), AccessDecision::RedirectToDashboard(Role::Owner));
        assert_eq!(decide("/", Some(Role::Tenant)), AccessDecision::RedirectToDashboard(Role::Tenant));
    }

    #[test]
    fn test_wrong_role_redirects_to_own_dashboard() {
        assert_eq!(
            decide("/owner/rooms", Some(Role::Tenant)),
            AccessDecision::RedirectToDashboard(Role::Tenant)
        );
        assert_eq!(
            decide("/tenant/payments", Some(Role::Owner)),
            AccessDecision::RedirectToDashboard(Role::Owner)
        );
    }

    #[test]
    fn test_matching_role_renders() {
        assert_eq!(decide("/owner/rooms", Some(Role::Owner)), AccessDecision::Render);
        assert_eq!(decide("/tenant/payments/new", Some(Role::Tenant)), AccessDecision::Render);
    }
}
