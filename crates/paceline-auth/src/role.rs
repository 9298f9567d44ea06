use serde::Deserialize;
use serde::Serialize;

/// Account role deciding which privileged area a session may enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    GroupOwner,
}

impl Role {
    /// Database and wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::GroupOwner => "group_owner",
        }
    }
    /// Home page for the role, used for cross-role redirects.
    pub fn home(&self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::GroupOwner => "/profile",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "group_owner" => Ok(Self::GroupOwner),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for role in [Role::Admin, Role::GroupOwner] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }
    #[test]
    fn rejects_unknown() {
        assert!("runner".parse::<Role>().is_err());
    }
    #[test]
    fn homes_differ() {
        assert_ne!(Role::Admin.home(), Role::GroupOwner.home());
    }
}
