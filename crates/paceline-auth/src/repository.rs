use super::*;
use paceline_core::ID;
use paceline_core::Unique;
use paceline_pg::*;
use std::sync::Arc;
use tokio_postgres::Client;
use tokio_postgres::Row;

/// Repository trait for credential and session database operations.
/// Abstracts SQL from domain modules.
#[allow(async_fn_in_trait)]
pub trait AuthRepository {
    async fn lookup(&self, email: &str) -> Result<Option<(Group, String)>, PgErr>;
    async fn fetch(&self, group: ID<Group>) -> Result<Option<Group>, PgErr>;
    async fn groups(&self) -> Result<Vec<Group>, PgErr>;
    async fn create(&self, group: &Group, hashword: &str) -> Result<(), PgErr>;
    async fn update(&self, group: &Group) -> Result<u64, PgErr>;
    async fn delete(&self, group: ID<Group>) -> Result<u64, PgErr>;
    async fn rekey(&self, group: ID<Group>, hashword: &str, first_login: bool)
    -> Result<(), PgErr>;
    async fn signin(&self, session: &Session) -> Result<(), PgErr>;
    async fn signout(&self, session: ID<Session>) -> Result<u64, PgErr>;
    /// True iff the session row exists AND its stored token digest matches.
    /// Binds a cookie to the exact token it was minted with.
    async fn attested(&self, session: ID<Session>, digest: &[u8]) -> Result<bool, PgErr>;
}

const GROUP_COLUMNS: &str = "id, name, email, role, description, first_login, created_at";

fn hydrate(row: &Row) -> Group {
    Group::stored(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        row.get::<_, String>(1),
        row.get::<_, String>(2),
        row.get::<_, String>(3).parse().expect("stored role"),
        row.get::<_, String>(4),
        row.get::<_, bool>(5),
        row.get::<_, std::time::SystemTime>(6),
    )
}

impl AuthRepository for Arc<Client> {
    async fn lookup(&self, email: &str) -> Result<Option<(Group, String)>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT ",
                GROUP_COLUMNS,
                ", hashword FROM ",
                GROUPS,
                " WHERE email = $1"
            ),
            &[&email],
        )
        .await
        .map(|opt| opt.map(|row| (hydrate(&row), row.get::<_, String>(7))))
    }

    async fn fetch(&self, group: ID<Group>) -> Result<Option<Group>, PgErr> {
        self.query_opt(
            const_format::concatcp!("SELECT ", GROUP_COLUMNS, " FROM ", GROUPS, " WHERE id = $1"),
            &[&group.inner()],
        )
        .await
        .map(|opt| opt.map(|row| hydrate(&row)))
    }

    async fn groups(&self) -> Result<Vec<Group>, PgErr> {
        self.query(
            const_format::concatcp!("SELECT ", GROUP_COLUMNS, " FROM ", GROUPS, " ORDER BY name"),
            &[],
        )
        .await
        .map(|rows| rows.iter().map(hydrate).collect())
    }

    async fn create(&self, group: &Group, hashword: &str) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                GROUPS,
                " (id, name, email, hashword, role, description, first_login, created_at)
                  VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
            ),
            &[
                &group.id().inner(),
                &group.name(),
                &group.email(),
                &hashword,
                &group.role().as_str(),
                &group.description(),
                &group.first_login(),
                &group.created_at(),
            ],
        )
        .await
        .map(|_| ())
    }

    async fn update(&self, group: &Group) -> Result<u64, PgErr> {
        self.execute(
            const_format::concatcp!(
                "UPDATE ",
                GROUPS,
                " SET name = $2, description = $3 WHERE id = $1"
            ),
            &[&group.id().inner(), &group.name(), &group.description()],
        )
        .await
    }

    async fn delete(&self, group: ID<Group>) -> Result<u64, PgErr> {
        self.execute(
            const_format::concatcp!("DELETE FROM ", GROUPS, " WHERE id = $1"),
            &[&group.inner()],
        )
        .await
    }

    async fn rekey(
        &self,
        group: ID<Group>,
        hashword: &str,
        first_login: bool,
    ) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "UPDATE ",
                GROUPS,
                " SET hashword = $2, first_login = $3 WHERE id = $1"
            ),
            &[&group.inner(), &hashword, &first_login],
        )
        .await
        .map(|_| ())
    }

    async fn signin(&self, session: &Session) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                SESSIONS,
                " (id, group_id, token_hash, created_at) VALUES ($1, $2, $3, $4)"
            ),
            &[
                &session.id().inner(),
                &session.group().inner(),
                &session.hash(),
                &session.created_at(),
            ],
        )
        .await
        .map(|_| ())
    }

    async fn signout(&self, session: ID<Session>) -> Result<u64, PgErr> {
        self.execute(
            const_format::concatcp!("DELETE FROM ", SESSIONS, " WHERE id = $1"),
            &[&session.inner()],
        )
        .await
    }

    async fn attested(&self, session: ID<Session>, digest: &[u8]) -> Result<bool, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT 1 FROM ",
                SESSIONS,
                " WHERE id = $1 AND token_hash = $2"
            ),
            &[&session.inner(), &digest],
        )
        .await
        .map(|opt| opt.is_some())
    }
}
