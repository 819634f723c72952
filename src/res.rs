use std::borrow::Cow;

use serde::Serialize;

/// Standard response body: `{ "message": ..., "data": ... }`.
///
/// `data` is always present on the wire and is `null` when there is nothing to return.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub message: Cow<'static, str>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn new(message: impl Into<Cow<'static, str>>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn message(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}
