use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

pub(crate) type UserId = i32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    Admin,
    User,
}

impl Role {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub(crate) struct UnknownRole(String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct User {
    pub(crate) id: UserId,
    pub(crate) email: String,
    pub(crate) password_hash: String,
    pub(crate) role: Role,
    pub(crate) is_verified: bool,
}

/// A row as handed to [`CredentialStore::create`](crate::store::CredentialStore::create).
#[derive(Clone, Debug)]
pub(crate) struct NewUser {
    pub(crate) email: String,
    pub(crate) password_hash: String,
    pub(crate) role: Role,
    pub(crate) is_verified: bool,
}

/// The only projection of a user that leaves the service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct PublicUser {
    pub(crate) id: UserId,
    pub(crate) email: String,
    pub(crate) role: Role,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserSummary {
    pub(crate) id: UserId,
    pub(crate) email: String,
    pub(crate) role: Role,
    pub(crate) is_verified: bool,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
            is_verified: user.is_verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_its_text_form() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::User.to_string(), "user");
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn public_projection_drops_the_hash() {
        let user = User {
            id: 7,
            email: "a@x.com".into(),
            password_hash: "$2b$04$hash".into(),
            role: Role::User,
            is_verified: true,
        };

        let json = serde_json::to_value(PublicUser::from(&user)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "id": 7, "email": "a@x.com", "role": "user" })
        );
    }
}
