use paceline_auth::Group;
use paceline_core::CACHE_DURATION;
use paceline_core::Cache;
use paceline_records::Event;

/// Best-effort projection caches injected into the handler layer.
///
/// Populated on read, invalidated by key on every write, expired on a
/// fixed window otherwise. Never consulted on a write path; correctness
/// does not depend on them.
pub struct Caches {
    pub groups: Cache<uuid::Uuid, Group>,
    pub events: Cache<uuid::Uuid, Event>,
}

impl Caches {
    pub fn new() -> Self {
        Self {
            groups: Cache::new(CACHE_DURATION),
            events: Cache::new(CACHE_DURATION),
        }
    }
}

impl Default for Caches {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paceline_auth::Role;
    use paceline_core::ID;
    use paceline_core::Unique;

    #[test]
    fn rewritten_group_projection_is_dropped() {
        let caches = Caches::new();
        let group = Group::new(
            ID::default(),
            "A".into(),
            "a@x.com".into(),
            Role::GroupOwner,
            String::new(),
        );
        let id = group.id().inner();
        caches.groups.put(id, group);
        assert!(caches.groups.get(&id).is_some());
        caches.groups.invalidate(&id);
        assert!(caches.groups.get(&id).is_none());
    }

    #[test]
    fn group_cascade_clears_event_projections() {
        let caches = Caches::new();
        let event = Event::new(
            ID::default(),
            ID::default(),
            "Sunday Long Run".into(),
            "Riverside Park".into(),
            std::time::SystemTime::now(),
            21.1,
            vec![],
        );
        let id = event.id().inner();
        caches.events.put(id, event);
        caches.events.clear();
        assert!(caches.events.get(&id).is_none());
    }
}
