pub(crate) mod request;
pub(crate) mod response;
pub(crate) mod user;

pub(crate) use user::{NewUser, PublicUser, Role, User, UserId, UserSummary};
