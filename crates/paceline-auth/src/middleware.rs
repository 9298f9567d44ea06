use super::*;
use paceline_core::ApiError;
use paceline_core::ID;
use actix_web::FromRequest;
use actix_web::HttpRequest;
use actix_web::dev::Payload;
use actix_web::web;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio_postgres::Client;

/// Cookie-token validation shared by the [`Auth`] extractor and the route
/// guard: decode, expiry check, then session-row attestation against the
/// stored token digest. A session is live only while its row exists, so a
/// replayed cookie fails here after logout.
pub async fn authenticate<R>(db: &R, tokens: &Crypto, token: &str) -> Result<Claims, ApiError>
where
    R: AuthRepository,
{
    let claims = tokens
        .decode(token)
        .map_err(|_| ApiError::Unauthorized("invalid token".into()))?;
    if claims.expired() {
        return Err(ApiError::Unauthorized("token expired".into()));
    }
    match db.attested(claims.session(), &Crypto::hash(token)).await {
        Ok(true) => Ok(claims),
        Ok(false) => Err(ApiError::Unauthorized("session revoked".into())),
        Err(e) => Err(ApiError::internal(e)),
    }
}

/// Extractor for authenticated requests.
/// Reads the session cookie and runs [`authenticate`] against app state.
pub struct Auth(pub Claims);

impl Auth {
    pub fn claims(&self) -> &Claims {
        &self.0
    }
    pub fn group(&self) -> ID<Group> {
        self.0.group()
    }
    pub fn role(&self) -> Role {
        self.0.role()
    }
    /// Role gate for privileged endpoints.
    pub fn require(&self, role: Role) -> Result<(), ApiError> {
        match self.role() == role {
            true => Ok(()),
            false => Err(ApiError::Forbidden("insufficient role".into())),
        }
    }
    /// Owner-or-admin gate for group-scoped resources.
    pub fn owns(&self, group: ID<Group>) -> Result<(), ApiError> {
        match self.group() == group || self.role() == Role::Admin {
            true => Ok(()),
            false => Err(ApiError::Forbidden("not the owning group".into())),
        }
    }
}

impl FromRequest for Auth {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let tokens = req.app_data::<web::Data<Crypto>>().cloned();
        let db = req.app_data::<web::Data<Arc<Client>>>().cloned();
        let cookie = req.cookie(SESSION_COOKIE).map(|c| c.value().to_owned());
        Box::pin(async move {
            let token =
                cookie.ok_or_else(|| ApiError::Unauthorized("missing session cookie".into()))?;
            let tokens = tokens.ok_or_else(|| ApiError::internal("token service missing"))?;
            let db = db.ok_or_else(|| ApiError::internal("database missing"))?;
            Ok(Auth(authenticate(db.get_ref(), &tokens, &token).await?))
        })
    }
}

/// Optional authentication extractor - does not fail if unauthenticated.
/// Drives the visibility rule on public event reads.
pub struct MaybeAuth(pub Option<Claims>);

impl MaybeAuth {
    pub fn claims(&self) -> Option<&Claims> {
        self.0.as_ref()
    }
    pub fn authenticated(&self) -> bool {
        self.0.is_some()
    }
}

impl FromRequest for MaybeAuth {
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;
    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let auth_future = Auth::from_request(req, payload);
        Box::pin(async move {
            match auth_future.await {
                Ok(Auth(claims)) => Ok(MaybeAuth(Some(claims))),
                Err(_) => Ok(MaybeAuth(None)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paceline_core::Unique;
    use paceline_pg::PgErr;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Session-table stand-in: sid → stored token digest.
    struct Sessions(Mutex<HashMap<uuid::Uuid, Vec<u8>>>);

    impl Sessions {
        fn new() -> Self {
            Self(Mutex::new(HashMap::new()))
        }
    }

    impl AuthRepository for Sessions {
        async fn signin(&self, session: &Session) -> Result<(), PgErr> {
            self.0
                .lock()
                .unwrap()
                .insert(session.id().inner(), session.hash().to_vec());
            Ok(())
        }
        async fn signout(&self, session: ID<Session>) -> Result<u64, PgErr> {
            Ok(self.0.lock().unwrap().remove(&session.inner()).is_some() as u64)
        }
        async fn attested(&self, session: ID<Session>, digest: &[u8]) -> Result<bool, PgErr> {
            Ok(self
                .0
                .lock()
                .unwrap()
                .get(&session.inner())
                .is_some_and(|stored| stored == digest))
        }
        async fn lookup(&self, _: &str) -> Result<Option<(Group, String)>, PgErr> {
            unreachable!()
        }
        async fn fetch(&self, _: ID<Group>) -> Result<Option<Group>, PgErr> {
            unreachable!()
        }
        async fn groups(&self) -> Result<Vec<Group>, PgErr> {
            unreachable!()
        }
        async fn create(&self, _: &Group, _: &str) -> Result<(), PgErr> {
            unreachable!()
        }
        async fn update(&self, _: &Group) -> Result<u64, PgErr> {
            unreachable!()
        }
        async fn delete(&self, _: ID<Group>) -> Result<u64, PgErr> {
            unreachable!()
        }
        async fn rekey(&self, _: ID<Group>, _: &str, _: bool) -> Result<(), PgErr> {
            unreachable!()
        }
    }

    fn claims(session: ID<Session>) -> Claims {
        Claims::new(
            ID::default(),
            session,
            "a@x.com".into(),
            Role::GroupOwner,
            "A".into(),
        )
    }

    #[tokio::test]
    async fn live_session_authenticates() {
        let crypto = Crypto::new(b"secret");
        let db = Sessions::new();
        let sid = ID::default();
        let token = crypto.encode(&claims(sid)).unwrap();
        let session = Session::new(sid, ID::default(), Crypto::hash(&token));
        db.signin(&session).await.unwrap();
        let authed = authenticate(&db, &crypto, &token).await.unwrap();
        assert_eq!(authed.session(), sid);
    }

    #[tokio::test]
    async fn replayed_token_after_signout_is_rejected() {
        let crypto = Crypto::new(b"secret");
        let db = Sessions::new();
        let sid = ID::default();
        let token = crypto.encode(&claims(sid)).unwrap();
        let session = Session::new(sid, ID::default(), Crypto::hash(&token));
        db.signin(&session).await.unwrap();
        assert!(authenticate(&db, &crypto, &token).await.is_ok());
        db.signout(sid).await.unwrap();
        let err = authenticate(&db, &crypto, &token).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn token_not_matching_stored_digest_is_rejected() {
        let crypto = Crypto::new(b"secret");
        let db = Sessions::new();
        let sid = ID::default();
        let minted = crypto.encode(&claims(sid)).unwrap();
        let session = Session::new(sid, ID::default(), Crypto::hash(&minted));
        db.signin(&session).await.unwrap();
        let mut other = claims(sid);
        other.eml = "b@x.com".into();
        let foreign = crypto.encode(&other).unwrap();
        let err = authenticate(&db, &crypto, &foreign).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let crypto = Crypto::new(b"secret");
        let db = Sessions::new();
        let err = authenticate(&db, &crypto, "not-a-jwt").await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
