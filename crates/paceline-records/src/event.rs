use paceline_auth::Group;
use paceline_core::ID;
use paceline_core::SECRET_CODE_LENGTH;
use paceline_core::Unique;

/// Scheduled run owned by one group.
///
/// The secret code is minted at creation, immutable afterwards, and is the
/// sole capability required to join: anyone holding it has full join
/// capability, with no expiry or single-use semantics. Tightening that
/// policy belongs in the roster gate, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    id: ID<Self>,
    group: ID<Group>,
    name: String,
    location: String,
    starts_at: std::time::SystemTime,
    distance: f64,
    pace_groups: Vec<String>,
    secret: String,
}

impl Event {
    /// Creates a new event, minting its join secret.
    pub fn new(
        id: ID<Self>,
        group: ID<Group>,
        name: String,
        location: String,
        starts_at: std::time::SystemTime,
        distance: f64,
        pace_groups: Vec<String>,
    ) -> Self {
        Self {
            id,
            group,
            name,
            location,
            starts_at,
            distance,
            pace_groups,
            secret: mint(),
        }
    }
    /// Rehydrate a stored record, keeping its original secret.
    pub fn stored(
        id: ID<Self>,
        group: ID<Group>,
        name: String,
        location: String,
        starts_at: std::time::SystemTime,
        distance: f64,
        pace_groups: Vec<String>,
        secret: String,
    ) -> Self {
        Self {
            id,
            group,
            name,
            location,
            starts_at,
            distance,
            pace_groups,
            secret,
        }
    }
    pub fn group(&self) -> ID<Group> {
        self.group
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn location(&self) -> &str {
        &self.location
    }
    pub fn starts_at(&self) -> std::time::SystemTime {
        self.starts_at
    }
    pub fn distance(&self) -> f64 {
        self.distance
    }
    pub fn pace_groups(&self) -> &[String] {
        &self.pace_groups
    }
    pub fn secret(&self) -> &str {
        &self.secret
    }
    /// The per-request capability check: supplied code against the stored
    /// secret. Re-validated at every mutating call site, never cached.
    pub fn admits(&self, code: &str) -> bool {
        self.secret == code
    }
    pub fn revise(
        &mut self,
        name: String,
        location: String,
        starts_at: std::time::SystemTime,
        distance: f64,
        pace_groups: Vec<String>,
    ) {
        self.name = name;
        self.location = location;
        self.starts_at = starts_at;
        self.distance = distance;
        self.pace_groups = pace_groups;
    }
}

impl Unique for Event {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

fn mint() -> String {
    use rand::Rng;
    rand::rng()
        .sample_iter(rand::distr::Alphanumeric)
        .take(SECRET_CODE_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use paceline_pg::*;

    impl Schema for Event {
        fn name() -> &'static str {
            EVENTS
        }
        fn columns() -> &'static [tokio_postgres::types::Type] {
            &[
                tokio_postgres::types::Type::UUID,
                tokio_postgres::types::Type::UUID,
                tokio_postgres::types::Type::VARCHAR,
                tokio_postgres::types::Type::VARCHAR,
                tokio_postgres::types::Type::TIMESTAMPTZ,
                tokio_postgres::types::Type::FLOAT8,
                tokio_postgres::types::Type::TEXT_ARRAY,
                tokio_postgres::types::Type::TEXT,
            ]
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                EVENTS,
                " (
                    id          UUID PRIMARY KEY,
                    group_id    UUID NOT NULL REFERENCES ",
                GROUPS,
                "(id) ON DELETE CASCADE,
                    name        VARCHAR(255) NOT NULL,
                    location    VARCHAR(255) NOT NULL,
                    starts_at   TIMESTAMPTZ NOT NULL,
                    distance    DOUBLE PRECISION NOT NULL,
                    pace_groups TEXT[] NOT NULL DEFAULT '{}',
                    secret_code TEXT UNIQUE NOT NULL
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_events_group ON ",
                EVENTS,
                " (group_id);
                 CREATE INDEX IF NOT EXISTS idx_events_secret ON ",
                EVENTS,
                " (secret_code);"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> Event {
        Event::new(
            ID::default(),
            ID::default(),
            "Sunday Long Run".into(),
            "Riverside Park".into(),
            std::time::SystemTime::now(),
            21.1,
            vec!["5:00".into(), "5:30".into()],
        )
    }

    #[test]
    fn minted_secret_shape() {
        let event = event();
        assert_eq!(event.secret().len(), SECRET_CODE_LENGTH);
        assert!(event.secret().chars().all(|c| c.is_ascii_alphanumeric()));
    }
    #[test]
    fn secrets_differ_across_events() {
        assert_ne!(event().secret(), event().secret());
    }
    #[test]
    fn admits_only_exact_code() {
        let event = event();
        assert!(event.admits(&event.secret().to_string()));
        assert!(!event.admits("wrong-code"));
        assert!(!event.admits(&event.secret().to_uppercase()));
    }
}
