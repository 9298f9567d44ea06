use paceline_auth::Group;
use paceline_core::ID;
use paceline_core::Unique;
use paceline_pg::*;
use paceline_records::Event;
use paceline_records::Member;
use paceline_records::Participant;
use std::sync::Arc;
use tokio_postgres::Client;
use tokio_postgres::Row;

/// Repository trait for event, member, and participant database operations.
/// Abstracts SQL from the gate and the HTTP layer.
#[allow(async_fn_in_trait)]
pub trait RosterRepository {
    async fn events(&self) -> Result<Vec<Event>, PgErr>;
    async fn event(&self, event: ID<Event>) -> Result<Option<Event>, PgErr>;
    async fn by_secret(&self, code: &str) -> Result<Option<Event>, PgErr>;
    async fn create_event(&self, event: &Event) -> Result<(), PgErr>;
    async fn update_event(&self, event: &Event) -> Result<u64, PgErr>;
    async fn delete_event(&self, event: ID<Event>) -> Result<u64, PgErr>;
    async fn members(&self, group: ID<Group>) -> Result<Vec<Member>, PgErr>;
    async fn member(&self, member: ID<Member>) -> Result<Option<Member>, PgErr>;
    async fn induct(&self, member: &Member) -> Result<(), PgErr>;
    async fn revise(&self, member: &Member) -> Result<u64, PgErr>;
    async fn expel(&self, group: ID<Group>, member: ID<Member>) -> Result<u64, PgErr>;
    /// Members of the owning group without a participant row for the event,
    /// ordered by name. The complement is never exposed to the public.
    async fn joinable(&self, event: &Event) -> Result<Vec<Member>, PgErr>;
    async fn enrolled(&self, event: ID<Event>, member: ID<Member>) -> Result<bool, PgErr>;
    async fn enroll(&self, participant: &Participant) -> Result<(), PgErr>;
    async fn withdraw(
        &self,
        event: ID<Event>,
        participant: ID<Participant>,
    ) -> Result<u64, PgErr>;
    async fn roster(&self, event: ID<Event>) -> Result<Vec<(Participant, Member)>, PgErr>;
    async fn headcount(&self, event: ID<Event>) -> Result<i64, PgErr>;
}

const EVENT_COLUMNS: &str =
    "id, group_id, name, location, starts_at, distance, pace_groups, secret_code";
const MEMBER_COLUMNS: &str = "id, group_id, name, age, gender, email";

fn event_from(row: &Row) -> Event {
    Event::stored(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        ID::from(row.get::<_, uuid::Uuid>(1)),
        row.get::<_, String>(2),
        row.get::<_, String>(3),
        row.get::<_, std::time::SystemTime>(4),
        row.get::<_, f64>(5),
        row.get::<_, Vec<String>>(6),
        row.get::<_, String>(7),
    )
}

fn member_from(row: &Row) -> Member {
    Member::new(
        ID::from(row.get::<_, uuid::Uuid>(0)),
        ID::from(row.get::<_, uuid::Uuid>(1)),
        row.get::<_, String>(2),
        row.get::<_, i16>(3),
        row.get::<_, String>(4),
        row.get::<_, Option<String>>(5),
    )
}

impl RosterRepository for Arc<Client> {
    async fn events(&self) -> Result<Vec<Event>, PgErr> {
        self.query(
            const_format::concatcp!(
                "SELECT ",
                EVENT_COLUMNS,
                " FROM ",
                EVENTS,
                " ORDER BY starts_at"
            ),
            &[],
        )
        .await
        .map(|rows| rows.iter().map(event_from).collect())
    }

    async fn event(&self, event: ID<Event>) -> Result<Option<Event>, PgErr> {
        self.query_opt(
            const_format::concatcp!("SELECT ", EVENT_COLUMNS, " FROM ", EVENTS, " WHERE id = $1"),
            &[&event.inner()],
        )
        .await
        .map(|opt| opt.map(|row| event_from(&row)))
    }

    async fn by_secret(&self, code: &str) -> Result<Option<Event>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT ",
                EVENT_COLUMNS,
                " FROM ",
                EVENTS,
                " WHERE secret_code = $1"
            ),
            &[&code],
        )
        .await
        .map(|opt| opt.map(|row| event_from(&row)))
    }

    async fn create_event(&self, event: &Event) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                EVENTS,
                " (id, group_id, name, location, starts_at, distance, pace_groups, secret_code)
                  VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
            ),
            &[
                &event.id().inner(),
                &event.group().inner(),
                &event.name(),
                &event.location(),
                &event.starts_at(),
                &event.distance(),
                &event.pace_groups(),
                &event.secret(),
            ],
        )
        .await
        .map(|_| ())
    }

    /// The secret code is immutable after creation and deliberately
    /// excluded from the update set.
    async fn update_event(&self, event: &Event) -> Result<u64, PgErr> {
        self.execute(
            const_format::concatcp!(
                "UPDATE ",
                EVENTS,
                " SET name = $2, location = $3, starts_at = $4, distance = $5, pace_groups = $6
                  WHERE id = $1"
            ),
            &[
                &event.id().inner(),
                &event.name(),
                &event.location(),
                &event.starts_at(),
                &event.distance(),
                &event.pace_groups(),
            ],
        )
        .await
    }

    async fn delete_event(&self, event: ID<Event>) -> Result<u64, PgErr> {
        self.execute(
            const_format::concatcp!("DELETE FROM ", EVENTS, " WHERE id = $1"),
            &[&event.inner()],
        )
        .await
    }

    async fn members(&self, group: ID<Group>) -> Result<Vec<Member>, PgErr> {
        self.query(
            const_format::concatcp!(
                "SELECT ",
                MEMBER_COLUMNS,
                " FROM ",
                MEMBERS,
                " WHERE group_id = $1 ORDER BY name"
            ),
            &[&group.inner()],
        )
        .await
        .map(|rows| rows.iter().map(member_from).collect())
    }

    async fn member(&self, member: ID<Member>) -> Result<Option<Member>, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT ",
                MEMBER_COLUMNS,
                " FROM ",
                MEMBERS,
                " WHERE id = $1"
            ),
            &[&member.inner()],
        )
        .await
        .map(|opt| opt.map(|row| member_from(&row)))
    }

    async fn induct(&self, member: &Member) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                MEMBERS,
                " (id, group_id, name, age, gender, email) VALUES ($1, $2, $3, $4, $5, $6)"
            ),
            &[
                &member.id().inner(),
                &member.group().inner(),
                &member.name(),
                &member.age(),
                &member.gender(),
                &member.email(),
            ],
        )
        .await
        .map(|_| ())
    }

    async fn revise(&self, member: &Member) -> Result<u64, PgErr> {
        self.execute(
            const_format::concatcp!(
                "UPDATE ",
                MEMBERS,
                " SET name = $2, age = $3, gender = $4, email = $5 WHERE id = $1"
            ),
            &[
                &member.id().inner(),
                &member.name(),
                &member.age(),
                &member.gender(),
                &member.email(),
            ],
        )
        .await
    }

    async fn expel(&self, group: ID<Group>, member: ID<Member>) -> Result<u64, PgErr> {
        self.execute(
            const_format::concatcp!(
                "DELETE FROM ",
                MEMBERS,
                " WHERE id = $1 AND group_id = $2"
            ),
            &[&member.inner(), &group.inner()],
        )
        .await
    }

    async fn joinable(&self, event: &Event) -> Result<Vec<Member>, PgErr> {
        self.query(
            const_format::concatcp!(
                "SELECT ",
                MEMBER_COLUMNS,
                " FROM ",
                MEMBERS,
                " WHERE group_id = $1 AND id NOT IN (SELECT member_id FROM ",
                PARTICIPANTS,
                " WHERE event_id = $2) ORDER BY name"
            ),
            &[&event.group().inner(), &event.id().inner()],
        )
        .await
        .map(|rows| rows.iter().map(member_from).collect())
    }

    async fn enrolled(&self, event: ID<Event>, member: ID<Member>) -> Result<bool, PgErr> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT 1 FROM ",
                PARTICIPANTS,
                " WHERE event_id = $1 AND member_id = $2"
            ),
            &[&event.inner(), &member.inner()],
        )
        .await
        .map(|opt| opt.is_some())
    }

    async fn enroll(&self, participant: &Participant) -> Result<(), PgErr> {
        self.execute(
            const_format::concatcp!(
                "INSERT INTO ",
                PARTICIPANTS,
                " (id, event_id, member_id) VALUES ($1, $2, $3)"
            ),
            &[
                &participant.id().inner(),
                &participant.event().inner(),
                &participant.member().inner(),
            ],
        )
        .await
        .map(|_| ())
    }

    async fn withdraw(
        &self,
        event: ID<Event>,
        participant: ID<Participant>,
    ) -> Result<u64, PgErr> {
        self.execute(
            const_format::concatcp!(
                "DELETE FROM ",
                PARTICIPANTS,
                " WHERE id = $1 AND event_id = $2"
            ),
            &[&participant.inner(), &event.inner()],
        )
        .await
    }

    async fn roster(&self, event: ID<Event>) -> Result<Vec<(Participant, Member)>, PgErr> {
        self.query(
            const_format::concatcp!(
                "SELECT p.id, p.event_id, p.member_id,
                        m.id, m.group_id, m.name, m.age, m.gender, m.email
                 FROM ",
                PARTICIPANTS,
                " p JOIN ",
                MEMBERS,
                " m ON m.id = p.member_id WHERE p.event_id = $1 ORDER BY m.name"
            ),
            &[&event.inner()],
        )
        .await
        .map(|rows| {
            rows.iter()
                .map(|row| {
                    (
                        Participant::new(
                            ID::from(row.get::<_, uuid::Uuid>(0)),
                            ID::from(row.get::<_, uuid::Uuid>(1)),
                            ID::from(row.get::<_, uuid::Uuid>(2)),
                        ),
                        Member::new(
                            ID::from(row.get::<_, uuid::Uuid>(3)),
                            ID::from(row.get::<_, uuid::Uuid>(4)),
                            row.get::<_, String>(5),
                            row.get::<_, i16>(6),
                            row.get::<_, String>(7),
                            row.get::<_, Option<String>>(8),
                        ),
                    )
                })
                .collect()
        })
    }

    async fn headcount(&self, event: ID<Event>) -> Result<i64, PgErr> {
        self.query_one(
            const_format::concatcp!(
                "SELECT COUNT(*) FROM ",
                PARTICIPANTS,
                " WHERE event_id = $1"
            ),
            &[&event.inner()],
        )
        .await
        .map(|row| row.get::<_, i64>(0))
    }
}
