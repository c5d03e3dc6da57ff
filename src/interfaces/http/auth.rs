use crate::domain::error::AppError;
use crate::domain::identity::UserIdentity;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const USER_NAME_HEADER: &str = "X-User-Name";
pub const USER_EMAIL_HEADER: &str = "X-User-Email";

/// Identity asserted by the upstream auth proxy.
pub struct AuthUser(pub UserIdentity);

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user_id = match header(req, USER_ID_HEADER) {
            Some(id) => id,
            None => {
                return ready(Err(AppError::Unauthorized(format!(
                    "Missing {} header",
                    USER_ID_HEADER
                ))))
            }
        };

        ready(Ok(AuthUser(UserIdentity {
            user_id,
            name: header(req, USER_NAME_HEADER),
            email: header(req, USER_EMAIL_HEADER),
        })))
    }
}

fn header(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
