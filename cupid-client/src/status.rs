//! Classification of Cupid HTTP outcomes.

use bytes::Bytes;

use crate::{CupidError, Result};

/// Outcome class of an HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx: the body is the payload.
    Success,
    /// 4xx: the request itself is at fault and is not worth retrying.
    ClientError,
    /// 5xx: the API is at fault; a later retry may succeed.
    ServerError,
    /// Anything else.
    Unexpected,
}

pub fn classify_status(status: u16) -> StatusClass {
    match status {
        200..=299 => StatusClass::Success,
        400..=499 => StatusClass::ClientError,
        500..=599 => StatusClass::ServerError,
        _ => StatusClass::Unexpected,
    }
}

/// Turns a response into its body on success or a typed error otherwise.
///
/// 4xx and 5xx responses keep the status and the correlation id so callers
/// can branch on the fault side without inspecting messages.
pub fn classify_response(status: u16, request_id: Option<String>, body: Bytes) -> Result<Bytes> {
    match classify_status(status) {
        StatusClass::Success => Ok(body),
        StatusClass::ClientError | StatusClass::ServerError => {
            Err(CupidError::Api { status, request_id })
        }
        StatusClass::Unexpected => Err(CupidError::UnexpectedStatus(status)),
    }
}
