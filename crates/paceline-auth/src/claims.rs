use super::*;
use paceline_core::ID;

/// JWT payload: a cache of the group's identity, not a source of truth.
/// Sensitive reads re-confirm identity and role against the store.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: uuid::Uuid,
    pub sid: uuid::Uuid,
    pub eml: String,
    pub rol: Role,
    pub nam: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(
        group: ID<Group>,
        session: ID<Session>,
        email: String,
        role: Role,
        name: String,
    ) -> Self {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time")
            .as_secs() as i64;
        Self {
            sub: group.inner(),
            sid: session.inner(),
            eml: email,
            rol: role,
            nam: name,
            iat: now,
            exp: now + Crypto::duration().as_secs() as i64,
        }
    }
    pub fn expired(&self) -> bool {
        self.exp
            < std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time")
                .as_secs() as i64
    }
    pub fn group(&self) -> ID<Group> {
        ID::from(self.sub)
    }
    pub fn session(&self) -> ID<Session> {
        ID::from(self.sid)
    }
    pub fn email(&self) -> &str {
        &self.eml
    }
    pub fn role(&self) -> Role {
        self.rol
    }
    pub fn name(&self) -> &str {
        &self.nam
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_claims_are_unexpired() {
        let claims = Claims::new(
            ID::default(),
            ID::default(),
            "a@x.com".into(),
            Role::GroupOwner,
            "A".into(),
        );
        assert!(!claims.expired());
        assert_eq!(claims.exp - claims.iat, Crypto::duration().as_secs() as i64);
    }
    #[test]
    fn past_expiry_is_expired() {
        let mut claims = Claims::new(
            ID::default(),
            ID::default(),
            "a@x.com".into(),
            Role::Admin,
            "A".into(),
        );
        claims.exp = claims.iat - 1;
        assert!(claims.expired());
    }
}
