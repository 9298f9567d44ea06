use super::*;
use paceline_core::Unique;
use serde::Deserialize;
use serde::Serialize;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub email: String,
    pub old_password: String,
    pub new_password: String,
    pub repeat_password: String,
}

/// Public projection of a group account. Never carries password material.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub description: String,
    pub first_login: bool,
}

impl From<&Group> for GroupInfo {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id().to_string(),
            name: group.name().to_string(),
            email: group.email().to_string(),
            role: group.role(),
            description: group.description().to_string(),
            first_login: group.first_login(),
        }
    }
}

/// One-time reveal of an administratively minted password.
#[derive(Serialize)]
pub struct ResetResponse {
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use paceline_core::ID;

    #[test]
    fn projection_has_no_password_field() {
        let group = Group::new(
            ID::default(),
            "A".into(),
            "a@x.com".into(),
            Role::GroupOwner,
            "weekend runs".into(),
        );
        let value = serde_json::to_value(GroupInfo::from(&group)).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert!(!keys.iter().any(|k| k.contains("password") || k.contains("hash")));
        assert_eq!(value["role"], "group_owner");
        assert_eq!(value["firstLogin"], true);
    }
}
