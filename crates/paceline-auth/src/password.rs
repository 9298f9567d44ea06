use argon2::Argon2;
use argon2::PasswordHash;
use argon2::PasswordHasher;
use argon2::PasswordVerifier;
use argon2::password_hash::SaltString;

fn salt() -> SaltString {
    use rand::Rng;
    let ref mut bytes = [0u8; 16];
    rand::rng().fill(bytes);
    SaltString::encode_b64(bytes).expect("salt")
}

pub fn hash(password: &str) -> Result<String, argon2::password_hash::Error> {
    Argon2::default()
        .hash_password(password.as_bytes(), &salt())
        .map(|h| h.to_string())
}

pub fn verify(password: &str, hashword: &str) -> bool {
    PasswordHash::new(hashword)
        .ok()
        .as_ref()
        .map(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), hash)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Mints a one-time temporary password for administrative resets.
/// Returned to the caller exactly once; only the hash is persisted.
pub fn generate() -> String {
    use rand::Rng;
    rand::rng()
        .sample_iter(rand::distr::Alphanumeric)
        .take(paceline_core::TEMP_PASSWORD_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_accepts_correct_password() {
        let hashword = hash("correct horse").unwrap();
        assert!(verify("correct horse", &hashword));
    }
    #[test]
    fn verify_rejects_wrong_password() {
        let hashword = hash("correct horse").unwrap();
        assert!(!verify("battery staple", &hashword));
    }
    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!verify("anything", "not-a-phc-string"));
    }
    #[test]
    fn generated_passwords_are_alphanumeric() {
        let password = generate();
        assert_eq!(password.len(), paceline_core::TEMP_PASSWORD_LENGTH);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }
    #[test]
    fn generated_passwords_differ() {
        assert_ne!(generate(), generate());
    }
}
