use serde::Deserialize;

/// Payload for creating a member, either from the owner's member screen or
/// from the public walk-on join flow.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDraft {
    pub name: String,
    pub age: i16,
    pub gender: String,
    #[serde(default)]
    pub email: Option<String>,
}
