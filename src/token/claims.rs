use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Role, User, UserId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Purpose {
    Verification,
    Session,
    PasswordReset,
}

impl Purpose {
    pub(crate) fn ttl(&self) -> Duration {
        match self {
            Purpose::Verification => Duration::hours(1),
            Purpose::Session => Duration::hours(12),
            Purpose::PasswordReset => Duration::hours(1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) role: Option<Role>,
    pub(crate) purpose: Purpose,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) jti: Option<String>,
}

impl Claims {
    pub(crate) fn verification(user: &User) -> Self {
        Self {
            id: user.id,
            email: Some(user.email.clone()),
            role: None,
            purpose: Purpose::Verification,
            jti: None,
        }
    }

    pub(crate) fn session(user: &User) -> Self {
        Self {
            id: user.id,
            email: Some(user.email.clone()),
            role: Some(user.role),
            purpose: Purpose::Session,
            jti: None,
        }
    }

    /// Carries the subject id only, plus a random id used to enforce single use.
    pub(crate) fn password_reset(user: &User) -> Self {
        Self {
            id: user.id,
            email: None,
            role: None,
            purpose: Purpose::PasswordReset,
            jti: Some(Uuid::new_v4().to_string()),
        }
    }
}
