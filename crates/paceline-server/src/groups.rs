use super::Caches;
use paceline_auth::Auth;
use paceline_auth::AuthRepository;
use paceline_auth::ChangePasswordRequest;
use paceline_auth::Group;
use paceline_auth::GroupInfo;
use paceline_auth::Role;
use paceline_auth::password;
use paceline_core::ApiError;
use paceline_core::ID;
use paceline_core::Unique;
use paceline_pg::PgErr;
use actix_web::HttpResponse;
use actix_web::web;
use serde::Deserialize;
use std::sync::Arc;
use tokio_postgres::Client;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDraft {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupUpdate {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

fn duplicate(err: &PgErr) -> bool {
    err.code() == Some(&tokio_postgres::error::SqlState::UNIQUE_VIOLATION)
}

pub async fn index(db: web::Data<Arc<Client>>, auth: Auth) -> Result<HttpResponse, ApiError> {
    auth.require(Role::Admin)?;
    let groups = db.groups().await.map_err(ApiError::internal)?;
    Ok(HttpResponse::Ok().json(groups.iter().map(GroupInfo::from).collect::<Vec<_>>()))
}

/// Administrative creation: mints a one-time temporary password and
/// returns it alongside the new account, exactly once.
pub async fn create(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    req: web::Json<GroupDraft>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Role::Admin)?;
    if req.name.is_empty() || req.email.is_empty() {
        return Err(ApiError::BadRequest("name and email are required".into()));
    }
    // fast-path friendliness; the unique constraint is the authority
    if db
        .lookup(&req.email)
        .await
        .map_err(ApiError::internal)?
        .is_some()
    {
        return Err(ApiError::Conflict("email already registered".into()));
    }
    let minted = password::generate();
    let hashword = password::hash(&minted).map_err(ApiError::internal)?;
    let group = Group::new(
        ID::default(),
        req.name.clone(),
        req.email.clone(),
        req.role.unwrap_or(Role::GroupOwner),
        req.description.clone(),
    );
    match db.create(&group, &hashword).await {
        Ok(()) => {}
        Err(ref e) if duplicate(e) => {
            return Err(ApiError::Conflict("email already registered".into()));
        }
        Err(e) => return Err(ApiError::internal(e)),
    }
    log::info!("group {} created", group.id());
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "group": GroupInfo::from(&group),
        "password": minted,
    })))
}

pub async fn show(
    db: web::Data<Arc<Client>>,
    caches: web::Data<Caches>,
    auth: Auth,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    auth.owns(ID::from(id))?;
    let group = match caches.groups.get(&id) {
        Some(group) => group,
        None => {
            let group = db
                .fetch(ID::from(id))
                .await
                .map_err(ApiError::internal)?
                .ok_or_else(|| ApiError::NotFound("group not found".into()))?;
            caches.groups.put(id, group.clone());
            group
        }
    };
    Ok(HttpResponse::Ok().json(GroupInfo::from(&group)))
}

pub async fn update(
    db: web::Data<Arc<Client>>,
    caches: web::Data<Caches>,
    auth: Auth,
    path: web::Path<uuid::Uuid>,
    req: web::Json<GroupUpdate>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    auth.owns(ID::from(id))?;
    if req.name.is_empty() {
        return Err(ApiError::BadRequest("name is required".into()));
    }
    let mut group = db
        .fetch(ID::from(id))
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound("group not found".into()))?;
    group.rename(req.name.clone(), req.description.clone());
    db.update(&group).await.map_err(ApiError::internal)?;
    caches.groups.invalidate(&id);
    Ok(HttpResponse::Ok().json(GroupInfo::from(&group)))
}

/// Deletion cascades to members, events, participants, and sessions at
/// the schema level.
pub async fn destroy(
    db: web::Data<Arc<Client>>,
    caches: web::Data<Caches>,
    auth: Auth,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, ApiError> {
    auth.require(Role::Admin)?;
    let id = path.into_inner();
    match db.delete(ID::from(id)).await.map_err(ApiError::internal)? {
        0 => Err(ApiError::NotFound("group not found".into())),
        _ => {
            caches.groups.invalidate(&id);
            // the cascade removed an unknown set of this group's events
            caches.events.clear();
            log::info!("group {} deleted", id);
            Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
        }
    }
}

/// Wraps the credential handler to keep the group projection cache
/// coherent: a password change flips `first_login` on the group row.
pub async fn change_password(
    db: web::Data<Arc<Client>>,
    caches: web::Data<Caches>,
    req: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, ApiError> {
    let rewritten = db
        .lookup(&req.email)
        .await
        .map_err(ApiError::internal)?
        .map(|(group, _)| group.id().inner());
    let response = paceline_auth::change_password(db, req).await?;
    if let Some(id) = rewritten {
        caches.groups.invalidate(&id);
    }
    Ok(response)
}

/// Same cache-coherence wrapper for administrative resets.
pub async fn reset_password(
    db: web::Data<Arc<Client>>,
    caches: web::Data<Caches>,
    auth: Auth,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = *path;
    let response = paceline_auth::reset_password(db, auth, path).await?;
    caches.groups.invalidate(&id);
    Ok(response)
}
