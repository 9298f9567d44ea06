use super::Caches;
use paceline_auth::Auth;
use paceline_auth::MaybeAuth;
use paceline_core::ApiError;
use paceline_core::ID;
use paceline_core::Unique;
use paceline_records::Event;
use paceline_roster::EventDetail;
use paceline_roster::EventPublic;
use paceline_roster::MemberDraft;
use paceline_roster::RosterRepository;
use paceline_roster::gate;
use actix_web::HttpResponse;
use actix_web::web;
use serde::Deserialize;
use std::sync::Arc;
use tokio_postgres::Client;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub name: String,
    pub location: String,
    /// Unix seconds.
    pub starts_at: i64,
    pub distance: f64,
    #[serde(default)]
    pub pace_groups: Vec<String>,
}

impl EventDraft {
    fn starts_at(&self) -> std::time::SystemTime {
        std::time::UNIX_EPOCH + std::time::Duration::from_secs(self.starts_at.max(0) as u64)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub member_id: uuid::Uuid,
    pub secret_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkEnrollRequest {
    pub member_ids: Vec<uuid::Uuid>,
    pub secret_key: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub secret_code: String,
    #[serde(default)]
    pub member_id: Option<uuid::Uuid>,
    #[serde(default)]
    pub member_data: Option<MemberDraft>,
}

/// The visibility rule, reapplied at every event read: without a valid
/// session the secret code is stripped and participants collapse to a
/// count; with one, full detail.
async fn shaped(
    db: &Arc<Client>,
    event: &Event,
    authenticated: bool,
) -> Result<serde_json::Value, ApiError> {
    match authenticated {
        true => {
            let roster = db.roster(event.id()).await.map_err(ApiError::internal)?;
            serde_json::to_value(EventDetail::new(event, &roster)).map_err(ApiError::internal)
        }
        false => {
            let count = db.headcount(event.id()).await.map_err(ApiError::internal)?;
            serde_json::to_value(EventPublic::new(event, count)).map_err(ApiError::internal)
        }
    }
}

pub async fn index(
    db: web::Data<Arc<Client>>,
    auth: MaybeAuth,
) -> Result<HttpResponse, ApiError> {
    let events = db.events().await.map_err(ApiError::internal)?;
    let mut views = Vec::with_capacity(events.len());
    for event in &events {
        views.push(shaped(&db, event, auth.authenticated()).await?);
    }
    Ok(HttpResponse::Ok().json(views))
}

pub async fn create(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    req: web::Json<EventDraft>,
) -> Result<HttpResponse, ApiError> {
    if req.name.is_empty() || req.location.is_empty() {
        return Err(ApiError::BadRequest("name and location are required".into()));
    }
    let event = Event::new(
        ID::default(),
        auth.group(),
        req.name.clone(),
        req.location.clone(),
        req.starts_at(),
        req.distance,
        req.pace_groups.clone(),
    );
    db.create_event(&event).await.map_err(ApiError::internal)?;
    log::info!("event {} created by group {}", event.id(), auth.group());
    Ok(HttpResponse::Ok().json(EventDetail::new(&event, &[])))
}

pub async fn show(
    db: web::Data<Arc<Client>>,
    caches: web::Data<Caches>,
    auth: MaybeAuth,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let event = match caches.events.get(&id) {
        Some(event) => event,
        None => {
            let event = db
                .event(ID::from(id))
                .await
                .map_err(ApiError::internal)?
                .ok_or_else(|| ApiError::NotFound("event not found".into()))?;
            caches.events.put(id, event.clone());
            event
        }
    };
    Ok(HttpResponse::Ok().json(shaped(&db, &event, auth.authenticated()).await?))
}

pub async fn update(
    db: web::Data<Arc<Client>>,
    caches: web::Data<Caches>,
    auth: Auth,
    path: web::Path<uuid::Uuid>,
    req: web::Json<EventDraft>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let mut event = db
        .event(ID::from(id))
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound("event not found".into()))?;
    auth.owns(event.group())?;
    event.revise(
        req.name.clone(),
        req.location.clone(),
        req.starts_at(),
        req.distance,
        req.pace_groups.clone(),
    );
    db.update_event(&event).await.map_err(ApiError::internal)?;
    caches.events.invalidate(&id);
    let roster = db.roster(event.id()).await.map_err(ApiError::internal)?;
    Ok(HttpResponse::Ok().json(EventDetail::new(&event, &roster)))
}

pub async fn destroy(
    db: web::Data<Arc<Client>>,
    caches: web::Data<Caches>,
    auth: Auth,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let event = db
        .event(ID::from(id))
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound("event not found".into()))?;
    auth.owns(event.group())?;
    db.delete_event(event.id()).await.map_err(ApiError::internal)?;
    caches.events.invalidate(&id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// Public preview reached from an invite link: never includes the secret
/// or participant identities, regardless of any cookie.
pub async fn preview(
    db: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let event = gate::resolve(db.get_ref(), &path).await?;
    let count = db.headcount(event.id()).await.map_err(ApiError::internal)?;
    Ok(HttpResponse::Ok().json(EventPublic::new(&event, count)))
}

pub async fn joinable(
    db: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let members = gate::joinable(db.get_ref(), &path).await?;
    Ok(HttpResponse::Ok().json(members))
}

pub async fn enroll(
    db: web::Data<Arc<Client>>,
    path: web::Path<uuid::Uuid>,
    req: web::Json<EnrollRequest>,
) -> Result<HttpResponse, ApiError> {
    let participant = gate::admit(
        db.get_ref(),
        ID::from(path.into_inner()),
        ID::from(req.member_id),
        &req.secret_key,
    )
    .await?;
    Ok(HttpResponse::Ok().json(participant))
}

pub async fn enroll_bulk(
    db: web::Data<Arc<Client>>,
    path: web::Path<uuid::Uuid>,
    req: web::Json<BulkEnrollRequest>,
) -> Result<HttpResponse, ApiError> {
    let members: Vec<_> = req.member_ids.iter().copied().map(ID::from).collect();
    let outcome = gate::admit_bulk(
        db.get_ref(),
        ID::from(path.into_inner()),
        &members,
        &req.secret_key,
    )
    .await?;
    match outcome.success() {
        true => Ok(HttpResponse::Ok().json(outcome)),
        false => Ok(HttpResponse::Conflict().json(outcome)),
    }
}

pub async fn withdraw(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<(uuid::Uuid, uuid::Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (event_id, participant_id) = path.into_inner();
    let event = db
        .event(ID::from(event_id))
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::NotFound("event not found".into()))?;
    auth.owns(event.group())?;
    gate::withdraw(db.get_ref(), event.id(), ID::from(participant_id)).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// Single public join endpoint: an existing member joins by id, or a new
/// member is created from the supplied draft and then admitted.
pub async fn join(
    db: web::Data<Arc<Client>>,
    req: web::Json<JoinRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();
    match (req.member_id, req.member_data) {
        (Some(member), _) => {
            let event = gate::resolve(db.get_ref(), &req.secret_code).await?;
            let participant =
                gate::admit(db.get_ref(), event.id(), ID::from(member), &req.secret_code).await?;
            Ok(HttpResponse::Ok().json(participant))
        }
        (None, Some(draft)) => {
            let participant = gate::walk_on(db.get_ref(), &req.secret_code, draft).await?;
            Ok(HttpResponse::Ok().json(participant))
        }
        (None, None) => Err(ApiError::BadRequest(
            "memberId or memberData is required".into(),
        )),
    }
}
