pub(crate) mod auth;
pub(crate) mod encode;
pub(crate) mod password;
pub(crate) mod validate;
