use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::AppResult;

/// Response body rendering. Non-ASCII text is written as-is; `indent == 0`
/// produces compact output.
#[derive(Clone, Copy, Debug)]
pub struct JsonStyle {
    indent: usize,
}

impl JsonStyle {
    pub fn new(indent: usize) -> Self {
        Self { indent }
    }

    pub fn to_vec<T: Serialize + ?Sized>(&self, value: &T) -> serde_json::Result<Vec<u8>> {
        if self.indent == 0 {
            return serde_json::to_vec(value);
        }
        let indent = " ".repeat(self.indent);
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
        value.serialize(&mut ser)?;
        Ok(buf)
    }

    pub fn respond<T: Serialize + ?Sized>(&self, status: StatusCode, value: &T) -> AppResult<Response> {
        let body = self.to_vec(value)?;
        Ok((
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"))],
            body,
        )
            .into_response())
    }
}
