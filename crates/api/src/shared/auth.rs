use crate::error::SubtrackError;
use actix_web::HttpRequest;
use subtle::ConstantTimeEq;
use subtrack_infra::SubtrackContext;
use tracing::warn;

pub const INTERNAL_API_KEY_HEADER: &str = "x-internal-api-key";

/// Only lets requests through that carry the configured internal api key
pub fn protect_internal_route(
    req: &HttpRequest,
    ctx: &SubtrackContext,
) -> Result<(), SubtrackError> {
    let expected_key = match &ctx.config.internal_api_key {
        Some(key) => key,
        None => {
            return Err(SubtrackError::ServiceUnavailable(
                "Internal API is not configured. INTERNAL_API_KEY is not set.".into(),
            ))
        }
    };

    let api_key = match req.headers().get(INTERNAL_API_KEY_HEADER) {
        Some(api_key) => match api_key.to_str() {
            Ok(api_key) => api_key,
            Err(_) => {
                return Err(SubtrackError::Unauthorized(
                    "Malformed internal api key provided".into(),
                ))
            }
        },
        None => {
            return Err(SubtrackError::Unauthorized(format!(
                "Unable to find api key in {} header",
                INTERNAL_API_KEY_HEADER
            )))
        }
    };

    if !bool::from(api_key.as_bytes().ct_eq(expected_key.as_bytes())) {
        warn!("Invalid internal api key attempted");
        return Err(SubtrackError::Unauthorized(format!(
            "Invalid api key provided in {} header",
            INTERNAL_API_KEY_HEADER
        )));
    }

    Ok(())
}
