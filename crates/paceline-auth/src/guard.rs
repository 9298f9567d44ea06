//! Role-based redirect gating for privileged page prefixes.
//!
//! `/admin*` requires [`Role::Admin`]; `/profile*` requires
//! [`Role::GroupOwner`]. A valid session with the wrong role is redirected
//! to its own home rather than denied. Everything else passes through.
use super::*;
use actix_web::HttpResponse;
use actix_web::body::EitherBody;
use actix_web::body::MessageBody;
use actix_web::dev::ServiceRequest;
use actix_web::dev::ServiceResponse;
use actix_web::middleware::Next;
use actix_web::web;
use std::sync::Arc;
use tokio_postgres::Client;

/// Outcome of the guard's pure decision function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Not a privileged path, or the session role matches.
    Pass,
    /// No valid session: redirect to the login page.
    Login,
    /// Valid session, wrong role: redirect to this role's home.
    Elsewhere(Role),
}

/// Role required to serve the path, if it is privileged.
pub fn required(path: &str) -> Option<Role> {
    if path.starts_with("/admin") {
        Some(Role::Admin)
    } else if path.starts_with("/profile") {
        Some(Role::GroupOwner)
    } else {
        None
    }
}

/// Pure decision: (path, role-of-valid-session-if-any) → verdict.
pub fn decide(path: &str, role: Option<Role>) -> Verdict {
    match (required(path), role) {
        (None, _) => Verdict::Pass,
        (Some(_), None) => Verdict::Login,
        (Some(need), Some(have)) if need == have => Verdict::Pass,
        (Some(_), Some(have)) => Verdict::Elsewhere(have),
    }
}

/// Resolves the session cookie to a role through [`authenticate`]: token
/// must decode, be unexpired, and its session row must still attest.
async fn resolve(req: &ServiceRequest) -> Option<Role> {
    let tokens = req.app_data::<web::Data<Crypto>>()?;
    let db = req.app_data::<web::Data<Arc<Client>>>()?;
    let cookie = req.request().cookie(SESSION_COOKIE)?;
    authenticate(db.get_ref(), tokens.get_ref(), cookie.value())
        .await
        .ok()
        .map(|claims| claims.role())
}

/// Middleware wrapper applying [`decide`] to every request.
/// Wire with `actix_web::middleware::from_fn(guard)`.
pub async fn guard<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, actix_web::Error>
where
    B: MessageBody + 'static,
{
    let role = match required(req.path()) {
        Some(_) => resolve(&req).await,
        None => None,
    };
    match decide(req.path(), role) {
        Verdict::Pass => next
            .call(req)
            .await
            .map(ServiceResponse::map_into_left_body),
        verdict => {
            let target = match verdict {
                Verdict::Elsewhere(role) => role.home(),
                _ => "/login",
            };
            log::debug!("guard redirecting {} to {}", req.path(), target);
            let (req, _) = req.into_parts();
            let res = HttpResponse::Found()
                .insert_header((actix_web::http::header::LOCATION, target))
                .finish();
            Ok(ServiceResponse::new(req, res).map_into_right_body())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_paths_pass() {
        assert_eq!(decide("/", None), Verdict::Pass);
        assert_eq!(decide("/api/events", None), Verdict::Pass);
        assert_eq!(decide("/login", Some(Role::Admin)), Verdict::Pass);
    }
    #[test]
    fn private_paths_require_session() {
        assert_eq!(decide("/admin", None), Verdict::Login);
        assert_eq!(decide("/admin/groups", None), Verdict::Login);
        assert_eq!(decide("/profile/events", None), Verdict::Login);
    }
    #[test]
    fn matching_role_passes() {
        assert_eq!(decide("/admin", Some(Role::Admin)), Verdict::Pass);
        assert_eq!(decide("/profile", Some(Role::GroupOwner)), Verdict::Pass);
    }
    #[test]
    fn cross_role_redirects_home() {
        assert_eq!(
            decide("/admin", Some(Role::GroupOwner)),
            Verdict::Elsewhere(Role::GroupOwner)
        );
        assert_eq!(
            decide("/profile/settings", Some(Role::Admin)),
            Verdict::Elsewhere(Role::Admin)
        );
    }
}
