use serde::{Deserialize, Serialize};

/// Server-side role attached to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

/// The `/user/profile` response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub credits: i64,
    pub role: Role,
}

/// Body returned by the auth endpoints.
///
/// Login responses carry at least a `message`; deployments that report the
/// granted role include it as well, so both fields are optional here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthOutcome {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_round_trips_role_casing() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"username":"alice","credits":5,"role":"admin"}"#)
                .unwrap();
        assert_eq!(profile.role, Role::Admin);
        assert!(profile.role.is_admin());
        assert_eq!(
            serde_json::to_value(&profile).unwrap()["role"],
            serde_json::json!("admin")
        );
    }

    #[test]
    fn auth_outcome_tolerates_message_only_bodies() {
        let outcome: AuthOutcome =
            serde_json::from_str(r#"{"message":"Login successful"}"#).unwrap();
        assert_eq!(outcome.message.as_deref(), Some("Login successful"));
        assert_eq!(outcome.role, None);
    }
}
