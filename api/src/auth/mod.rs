pub mod claims;
pub mod extractors;

pub use claims::{AuthUser, Claims};

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

/// Generates a JWT and its expiry timestamp for a given user.
///
/// Token issuance endpoints are out of scope; this exists for operators
/// minting tokens out of band and for tests.
pub fn generate_jwt(user_id: i64, teacher: bool) -> (String, String) {
    let jwt_secret = util::config::jwt_secret();
    let jwt_duration_minutes = util::config::jwt_duration_minutes() as i64;

    let expiry = Utc::now() + Duration::minutes(jwt_duration_minutes);
    let claims = Claims {
        sub: user_id,
        teacher,
        exp: expiry.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("Token encoding failed");

    (token, expiry.to_rfc3339())
}
