use super::*;
use paceline_core::ApiError;
use paceline_core::ID;
use paceline_core::Unique;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::cookie::Cookie;
use actix_web::cookie::SameSite;
use actix_web::web;
use std::sync::Arc;
use tokio_postgres::Client;

/// Builds the session cookie: http-only, SameSite=Lax, 24h max-age.
fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(actix_web::cookie::time::Duration::seconds(
            Crypto::duration().as_secs() as i64,
        ))
        .finish()
}

fn removal_cookie() -> Cookie<'static> {
    let mut cookie = session_cookie(String::new());
    cookie.make_removal();
    cookie
}

pub async fn login(
    db: web::Data<Arc<Client>>,
    tokens: web::Data<Crypto>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest("email and password are required".into()));
    }
    let (group, hashword) = db
        .lookup(&req.email)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::Unauthorized("invalid credentials".into()))?;
    if !password::verify(&req.password, &hashword) {
        return Err(ApiError::Unauthorized("invalid credentials".into()));
    }
    let session_id: ID<Session> = ID::default();
    let claims = Claims::new(
        group.id(),
        session_id,
        group.email().to_string(),
        group.role(),
        group.name().to_string(),
    );
    let token = tokens.encode(&claims).map_err(ApiError::internal)?;
    let session = Session::new(session_id, group.id(), Crypto::hash(&token));
    db.signin(&session).await.map_err(ApiError::internal)?;
    log::info!("group {} logged in", group.id());
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(token))
        .json(GroupInfo::from(&group)))
}

/// Idempotent: succeeds whether or not a live session cookie is present.
pub async fn logout(
    db: web::Data<Arc<Client>>,
    tokens: web::Data<Crypto>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if let Ok(claims) = tokens.decode(cookie.value()) {
            db.signout(claims.session())
                .await
                .map_err(ApiError::internal)?;
        }
    }
    Ok(HttpResponse::Ok()
        .cookie(removal_cookie())
        .json(serde_json::json!({ "success": true })))
}

/// Reloads the account fresh from the store; claims are only a cache.
pub async fn me(db: web::Data<Arc<Client>>, auth: Auth) -> Result<HttpResponse, ApiError> {
    let group = db
        .fetch(auth.group())
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound("group no longer exists".into()))?;
    Ok(HttpResponse::Ok().json(GroupInfo::from(&group)))
}

pub async fn change_password(
    db: web::Data<Arc<Client>>,
    req: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    if req.email.is_empty()
        || req.old_password.is_empty()
        || req.new_password.is_empty()
        || req.repeat_password.is_empty()
    {
        return Err(ApiError::BadRequest("all fields are required".into()));
    }
    if req.new_password != req.repeat_password {
        return Err(ApiError::BadRequest("passwords do not match".into()));
    }
    let (group, hashword) = db
        .lookup(&req.email)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::Unauthorized("invalid credentials".into()))?;
    if !password::verify(&req.old_password, &hashword) {
        return Err(ApiError::Unauthorized("invalid credentials".into()));
    }
    let rehashed = password::hash(&req.new_password).map_err(ApiError::internal)?;
    db.rekey(group.id(), &rehashed, false)
        .await
        .map_err(ApiError::internal)?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// Administrative reset: mints a temporary password, persists its hash,
/// flags the account for first login, and reveals the plaintext exactly
/// once for out-of-band relay.
pub async fn reset_password(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Role::Admin)?;
    let group: ID<Group> = ID::from(path.into_inner());
    db.fetch(group)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound("group not found".into()))?;
    let minted = password::generate();
    let hashword = password::hash(&minted).map_err(ApiError::internal)?;
    db.rekey(group, &hashword, true)
        .await
        .map_err(ApiError::internal)?;
    log::info!("password reset for group {}", group);
    Ok(HttpResponse::Ok().json(ResetResponse { password: minted }))
}
