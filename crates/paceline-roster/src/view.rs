use paceline_core::Unique;
use paceline_records::Event;
use paceline_records::Member;
use paceline_records::Participant;
use serde::Serialize;

fn epoch(at: std::time::SystemTime) -> i64 {
    at.duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    pub id: String,
    pub name: String,
    pub age: i16,
    pub gender: String,
    pub email: Option<String>,
}

impl From<&Member> for MemberInfo {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id().to_string(),
            name: member.name().to_string(),
            age: member.age(),
            gender: member.gender().to_string(),
            email: member.email().map(str::to_string),
        }
    }
}

/// Denormalized participant-with-member projection returned from admissions
/// and detailed event reads.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfo {
    pub id: String,
    pub event_id: String,
    pub member: MemberInfo,
}

impl ParticipantInfo {
    pub fn new(participant: &Participant, member: &Member) -> Self {
        Self {
            id: participant.id().to_string(),
            event_id: participant.event().to_string(),
            member: MemberInfo::from(member),
        }
    }
}

/// Event as shown to callers without a valid session: the secret code is
/// stripped and the participant list is reduced to a bare count.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPublic {
    pub id: String,
    pub name: String,
    pub location: String,
    pub starts_at: i64,
    pub distance: f64,
    pub pace_groups: Vec<String>,
    pub participants: i64,
}

impl EventPublic {
    pub fn new(event: &Event, participants: i64) -> Self {
        Self {
            id: event.id().to_string(),
            name: event.name().to_string(),
            location: event.location().to_string(),
            starts_at: epoch(event.starts_at()),
            distance: event.distance(),
            pace_groups: event.pace_groups().to_vec(),
            participants,
        }
    }
}

/// Event as shown to any authenticated caller: secret code and full
/// participant detail included.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    pub id: String,
    pub group_id: String,
    pub name: String,
    pub location: String,
    pub starts_at: i64,
    pub distance: f64,
    pub pace_groups: Vec<String>,
    pub secret_code: String,
    pub participants: Vec<ParticipantInfo>,
}

impl EventDetail {
    pub fn new(event: &Event, roster: &[(Participant, Member)]) -> Self {
        Self {
            id: event.id().to_string(),
            group_id: event.group().to_string(),
            name: event.name().to_string(),
            location: event.location().to_string(),
            starts_at: epoch(event.starts_at()),
            distance: event.distance(),
            pace_groups: event.pace_groups().to_vec(),
            secret_code: event.secret().to_string(),
            participants: roster
                .iter()
                .map(|(participant, member)| ParticipantInfo::new(participant, member))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paceline_core::ID;

    fn event() -> Event {
        Event::new(
            ID::default(),
            ID::default(),
            "Track Tuesday".into(),
            "City Stadium".into(),
            std::time::SystemTime::now(),
            10.0,
            vec!["4:30".into()],
        )
    }

    fn member() -> Member {
        Member::new(
            ID::default(),
            ID::default(),
            "Asha".into(),
            31,
            "female".into(),
            Some("asha@x.com".into()),
        )
    }

    #[test]
    fn public_view_strips_secret_and_identities() {
        let event = event();
        let value = serde_json::to_value(EventPublic::new(&event, 4)).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("secretCode"));
        assert_eq!(value["participants"], 4);
    }
    #[test]
    fn detail_view_carries_secret_and_roster() {
        let event = event();
        let member = member();
        let roster = vec![(
            Participant::new(ID::default(), event.id(), member.id()),
            member,
        )];
        let value = serde_json::to_value(EventDetail::new(&event, &roster)).unwrap();
        assert_eq!(value["secretCode"], event.secret());
        assert_eq!(value["participants"].as_array().unwrap().len(), 1);
        assert_eq!(value["participants"][0]["member"]["name"], "Asha");
    }
    #[test]
    fn member_info_keeps_optional_email_absent() {
        let member = Member::new(
            ID::default(),
            ID::default(),
            "Kofi".into(),
            24,
            "male".into(),
            None,
        );
        let value = serde_json::to_value(MemberInfo::from(&member)).unwrap();
        assert!(value["email"].is_null());
    }
}
