use super::*;

/// Name of the http-only session cookie carrying the signed token.
pub const SESSION_COOKIE: &str = "session-token";

/// Stateless JWT signing and verification.
pub struct Crypto {
    encoding: jsonwebtoken::EncodingKey,
    decoding: jsonwebtoken::DecodingKey,
}

impl Crypto {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: jsonwebtoken::EncodingKey::from_secret(secret),
            decoding: jsonwebtoken::DecodingKey::from_secret(secret),
        }
    }
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| String::default())
                .as_bytes(),
        )
    }
    pub fn encode(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), claims, &self.encoding)
    }
    pub fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &jsonwebtoken::Validation::default())
            .map(|data| data.claims)
    }
    /// Digest stored alongside the session row; the raw token never
    /// touches the database.
    pub fn hash(token: &str) -> Vec<u8> {
        use sha2::Digest;
        sha2::Sha256::digest(token.as_bytes()).to_vec()
    }
    pub const fn duration() -> std::time::Duration {
        paceline_core::SESSION_DURATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paceline_core::ID;

    #[test]
    fn encode_decode_round_trip() {
        let crypto = Crypto::new(b"test-secret");
        let group = ID::default();
        let session = ID::default();
        let claims = Claims::new(group, session, "a@x.com".into(), Role::GroupOwner, "A".into());
        let token = crypto.encode(&claims).unwrap();
        let decoded = crypto.decode(&token).unwrap();
        assert_eq!(decoded.group(), group);
        assert_eq!(decoded.session(), session);
        assert_eq!(decoded.role(), Role::GroupOwner);
        assert_eq!(decoded.email(), "a@x.com");
    }
    #[test]
    fn rejects_foreign_signature() {
        let ours = Crypto::new(b"ours");
        let theirs = Crypto::new(b"theirs");
        let claims = Claims::new(
            ID::default(),
            ID::default(),
            "a@x.com".into(),
            Role::Admin,
            "A".into(),
        );
        let token = theirs.encode(&claims).unwrap();
        assert!(ours.decode(&token).is_err());
    }
    #[test]
    fn digests_are_stable() {
        assert_eq!(Crypto::hash("token"), Crypto::hash("token"));
        assert_ne!(Crypto::hash("token"), Crypto::hash("other"));
    }
}
