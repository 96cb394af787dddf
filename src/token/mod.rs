//! Signed, expiring tokens. Nothing here is persisted: a token is valid exactly
//! when its signature checks out, its purpose matches, and it has not expired.

pub(crate) mod claims;
pub(crate) mod service;

pub(crate) use claims::{Claims, Purpose};
pub(crate) use service::TokenService;
