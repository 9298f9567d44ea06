use paceline_auth::Auth;
use paceline_core::ApiError;
use paceline_core::ID;
use paceline_core::Unique;
use paceline_records::Member;
use paceline_roster::MemberDraft;
use paceline_roster::MemberInfo;
use paceline_roster::RosterRepository;
use actix_web::HttpResponse;
use actix_web::web;
use std::sync::Arc;
use tokio_postgres::Client;

pub async fn index(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<uuid::Uuid>,
) -> Result<HttpResponse, ApiError> {
    let group = ID::from(path.into_inner());
    auth.owns(group)?;
    let members = db.members(group).await.map_err(ApiError::internal)?;
    Ok(HttpResponse::Ok().json(members.iter().map(MemberInfo::from).collect::<Vec<_>>()))
}

pub async fn create(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<uuid::Uuid>,
    req: web::Json<MemberDraft>,
) -> Result<HttpResponse, ApiError> {
    let group = ID::from(path.into_inner());
    auth.owns(group)?;
    if req.name.is_empty() {
        return Err(ApiError::BadRequest("name is required".into()));
    }
    let draft = req.into_inner();
    let member = Member::new(
        ID::default(),
        group,
        draft.name,
        draft.age,
        draft.gender,
        draft.email,
    );
    db.induct(&member).await.map_err(ApiError::internal)?;
    Ok(HttpResponse::Ok().json(MemberInfo::from(&member)))
}

pub async fn update(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<(uuid::Uuid, uuid::Uuid)>,
    req: web::Json<MemberDraft>,
) -> Result<HttpResponse, ApiError> {
    let (group, member) = path.into_inner();
    let group = ID::from(group);
    auth.owns(group)?;
    let mut member = db
        .member(ID::from(member))
        .await
        .map_err(ApiError::internal)?
        .filter(|m| m.group() == group)
        .ok_or_else(|| ApiError::NotFound("member not found".into()))?;
    let draft = req.into_inner();
    member.revise(draft.name, draft.age, draft.gender, draft.email);
    db.revise(&member).await.map_err(ApiError::internal)?;
    Ok(HttpResponse::Ok().json(MemberInfo::from(&member)))
}

/// Deletion is independent of event participation; participant rows for
/// the member cascade at the store.
pub async fn destroy(
    db: web::Data<Arc<Client>>,
    auth: Auth,
    path: web::Path<(uuid::Uuid, uuid::Uuid)>,
) -> Result<HttpResponse, ApiError> {
    let (group, member) = path.into_inner();
    let group = ID::from(group);
    auth.owns(group)?;
    match db
        .expel(group, ID::from(member))
        .await
        .map_err(ApiError::internal)?
    {
        0 => Err(ApiError::NotFound("member not found".into())),
        _ => Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true }))),
    }
}
