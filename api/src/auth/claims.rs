use serde::{Deserialize, Serialize};

/// JWT payload carried by every authenticated request.
///
/// `sub` is the user id; `teacher` distinguishes the two platform roles.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: i64,
    pub exp: usize,
    pub teacher: bool,
}

/// An authenticated caller, extracted from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);
