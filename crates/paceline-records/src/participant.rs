use super::Event;
use super::Member;
use paceline_core::ID;
use paceline_core::Unique;

/// Join record relating one member to one event.
///
/// The (event, member) pair is unique at the schema level; the
/// application-side existence check is only a friendlier fast path, and a
/// unique violation from the store is the authoritative duplicate signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    id: ID<Self>,
    event: ID<Event>,
    member: ID<Member>,
}

impl Participant {
    pub fn new(id: ID<Self>, event: ID<Event>, member: ID<Member>) -> Self {
        Self { id, event, member }
    }
    pub fn event(&self) -> ID<Event> {
        self.event
    }
    pub fn member(&self) -> ID<Member> {
        self.member
    }
}

impl Unique for Participant {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use paceline_pg::*;

    impl Schema for Participant {
        fn name() -> &'static str {
            PARTICIPANTS
        }
        fn columns() -> &'static [tokio_postgres::types::Type] {
            &[
                tokio_postgres::types::Type::UUID,
                tokio_postgres::types::Type::UUID,
                tokio_postgres::types::Type::UUID,
            ]
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                PARTICIPANTS,
                " (
                    id          UUID PRIMARY KEY,
                    event_id    UUID NOT NULL REFERENCES ",
                EVENTS,
                "(id) ON DELETE CASCADE,
                    member_id   UUID NOT NULL REFERENCES ",
                MEMBERS,
                "(id) ON DELETE CASCADE,
                    UNIQUE (event_id, member_id)
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE INDEX IF NOT EXISTS idx_participants_event ON ",
                PARTICIPANTS,
                " (event_id);
                 CREATE INDEX IF NOT EXISTS idx_participants_member ON ",
                PARTICIPANTS,
                " (member_id);"
            )
        }
    }
}
