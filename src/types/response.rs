use serde::Serialize;

use crate::types::{PublicUser, UserSummary};

#[derive(Debug, Serialize)]
pub(crate) struct Message {
    pub(crate) success: bool,
    pub(crate) message: String,
}

impl Message {
    pub(crate) fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub(crate) fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Login {
    pub(crate) success: bool,
    pub(crate) token: String,
    pub(crate) user: PublicUser,
}

impl Login {
    pub(crate) fn new(token: String, user: PublicUser) -> Self {
        Self {
            success: true,
            token,
            user,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct Users {
    pub(crate) success: bool,
    pub(crate) users: Vec<UserSummary>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdatedUser {
    pub(crate) success: bool,
    pub(crate) user: UserSummary,
}
