use super::*;
use paceline_core::ID;
use paceline_core::Unique;

/// Tenant account owning members and events.
///
/// The password hash is a database-only column, never part of the domain
/// type and never serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    id: ID<Self>,
    name: String,
    email: String,
    role: Role,
    description: String,
    first_login: bool,
    created_at: std::time::SystemTime,
}

impl Group {
    pub fn new(id: ID<Self>, name: String, email: String, role: Role, description: String) -> Self {
        Self {
            id,
            name,
            email,
            role,
            description,
            first_login: true,
            created_at: std::time::SystemTime::now(),
        }
    }
    /// Rehydrate a stored record with all persisted fields.
    pub fn stored(
        id: ID<Self>,
        name: String,
        email: String,
        role: Role,
        description: String,
        first_login: bool,
        created_at: std::time::SystemTime,
    ) -> Self {
        Self {
            id,
            name,
            email,
            role,
            description,
            first_login,
            created_at,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn role(&self) -> Role {
        self.role
    }
    pub fn description(&self) -> &str {
        &self.description
    }
    pub fn first_login(&self) -> bool {
        self.first_login
    }
    pub fn created_at(&self) -> std::time::SystemTime {
        self.created_at
    }
    pub fn rename(&mut self, name: String, description: String) {
        self.name = name;
        self.description = description;
    }
}

impl Unique for Group {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use paceline_pg::*;

    /// Schema implementation for Group (groups table).
    /// Note: hashword is a database-only field, not part of the Group domain type.
    impl Schema for Group {
        fn name() -> &'static str {
            GROUPS
        }
        fn columns() -> &'static [tokio_postgres::types::Type] {
            &[
                tokio_postgres::types::Type::UUID,
                tokio_postgres::types::Type::VARCHAR,
                tokio_postgres::types::Type::VARCHAR,
                tokio_postgres::types::Type::TEXT,
                tokio_postgres::types::Type::VARCHAR,
                tokio_postgres::types::Type::TEXT,
                tokio_postgres::types::Type::BOOL,
                tokio_postgres::types::Type::TIMESTAMPTZ,
            ]
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                GROUPS,
                " (
                    id          UUID PRIMARY KEY,
                    name        VARCHAR(255) NOT NULL,
                    email       VARCHAR(255) UNIQUE NOT NULL,
                    hashword    TEXT NOT NULL,
                    role        VARCHAR(16) NOT NULL,
                    description TEXT NOT NULL DEFAULT '',
                    first_login BOOLEAN NOT NULL DEFAULT TRUE,
                    created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_groups_email ON ",
                GROUPS,
                " (email);"
            )
        }
    }
}
