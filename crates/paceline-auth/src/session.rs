use super::*;
use paceline_core::ID;
use paceline_core::Unique;

/// Persisted login session.
///
/// A session is live only while its row exists; logout deletes the row,
/// which revokes the token server-side even before its expiry claim.
/// Rows whose tokens have expired are inert and are not actively pruned.
#[derive(Debug, Clone)]
pub struct Session {
    id: ID<Self>,
    group: ID<Group>,
    hash: Vec<u8>,
    created_at: std::time::SystemTime,
}

impl Session {
    pub fn new(id: ID<Self>, group: ID<Group>, hash: Vec<u8>) -> Self {
        Self {
            id,
            group,
            hash,
            created_at: std::time::SystemTime::now(),
        }
    }
    pub fn group(&self) -> ID<Group> {
        self.group
    }
    pub fn hash(&self) -> &[u8] {
        &self.hash
    }
    pub fn created_at(&self) -> std::time::SystemTime {
        self.created_at
    }
}

impl Unique for Session {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use paceline_pg::*;

    impl Schema for Session {
        fn name() -> &'static str {
            SESSIONS
        }
        fn columns() -> &'static [tokio_postgres::types::Type] {
            &[
                tokio_postgres::types::Type::UUID,
                tokio_postgres::types::Type::UUID,
                tokio_postgres::types::Type::BYTEA,
                tokio_postgres::types::Type::TIMESTAMPTZ,
            ]
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                SESSIONS,
                " (
                    id          UUID PRIMARY KEY,
                    group_id    UUID NOT NULL REFERENCES ",
                GROUPS,
                "(id) ON DELETE CASCADE,
                    token_hash  BYTEA NOT NULL,
                    created_at  TIMESTAMPTZ NOT NULL
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_sessions_group ON ",
                SESSIONS,
                " (group_id);"
            )
        }
    }
}
