use paceline_core::ID;
use paceline_records::Member;
use serde::Serialize;

/// Accounting for a bulk admission: per-member results are independent and
/// partial success is allowed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub total: usize,
    pub added: usize,
    pub failed: usize,
    pub errors: Vec<Refusal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Refusal {
    pub member_id: String,
    pub message: String,
}

impl Outcome {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            added: 0,
            failed: 0,
            errors: Vec::new(),
        }
    }
    pub fn admit(&mut self) {
        self.added += 1;
    }
    pub fn refuse(&mut self, member: ID<Member>, message: String) {
        self.failed += 1;
        self.errors.push(Refusal {
            member_id: member.to_string(),
            message,
        });
    }
    /// The call as a whole succeeds if at least one admission did.
    pub fn success(&self) -> bool {
        self.added > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_partial_success() {
        let mut outcome = Outcome::new(3);
        outcome.admit();
        outcome.admit();
        outcome.refuse(ID::default(), "already a participant".into());
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.added, 2);
        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.success());
    }
    #[test]
    fn all_failed_is_not_success() {
        let mut outcome = Outcome::new(2);
        outcome.refuse(ID::default(), "member not found".into());
        outcome.refuse(ID::default(), "already a participant".into());
        assert!(!outcome.success());
    }
    #[test]
    fn empty_bulk_is_not_success() {
        assert!(!Outcome::new(0).success());
    }
}
