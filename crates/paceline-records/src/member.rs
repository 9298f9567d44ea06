use paceline_auth::Group;
use paceline_core::ID;
use paceline_core::Unique;

/// Runner registered under exactly one owning group.
/// Deletion is independent of event participation; participant rows
/// cascade at the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    id: ID<Self>,
    group: ID<Group>,
    name: String,
    age: i16,
    gender: String,
    email: Option<String>,
}

impl Member {
    pub fn new(
        id: ID<Self>,
        group: ID<Group>,
        name: String,
        age: i16,
        gender: String,
        email: Option<String>,
    ) -> Self {
        Self {
            id,
            group,
            name,
            age,
            gender,
            email,
        }
    }
    pub fn group(&self) -> ID<Group> {
        self.group
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn age(&self) -> i16 {
        self.age
    }
    pub fn gender(&self) -> &str {
        &self.gender
    }
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }
    pub fn revise(&mut self, name: String, age: i16, gender: String, email: Option<String>) {
        self.name = name;
        self.age = age;
        self.gender = gender;
        self.email = email;
    }
}

impl Unique for Member {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use paceline_pg::*;

    impl Schema for Member {
        fn name() -> &'static str {
            MEMBERS
        }
        fn columns() -> &'static [tokio_postgres::types::Type] {
            &[
                tokio_postgres::types::Type::UUID,
                tokio_postgres::types::Type::UUID,
                tokio_postgres::types::Type::VARCHAR,
                tokio_postgres::types::Type::INT2,
                tokio_postgres::types::Type::VARCHAR,
                tokio_postgres::types::Type::VARCHAR,
            ]
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                MEMBERS,
                " (
                    id          UUID PRIMARY KEY,
                    group_id    UUID NOT NULL REFERENCES ",
                GROUPS,
                "(id) ON DELETE CASCADE,
                    name        VARCHAR(255) NOT NULL,
                    age         SMALLINT NOT NULL,
                    gender      VARCHAR(32) NOT NULL,
                    email       VARCHAR(255)
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_members_group ON ",
                MEMBERS,
                " (group_id);"
            )
        }
    }
}
