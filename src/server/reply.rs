// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use std::io::Cursor;

use serde_json::{json, Value};
use tiny_http::{Header, Response};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

const SECURITY_HEADERS: [(&str, &str); 4] = [
    ("X-Content-Type-Options", "nosniff"),
    ("X-Frame-Options", "SAMEORIGIN"),
    ("Referrer-Policy", "no-referrer"),
    ("Cross-Origin-Resource-Policy", "same-origin"),
];

/// A JSON response waiting to be sent.
#[derive(Debug, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn failure(status: u16, message: &str) -> Self {
        Self {
            status,
            body: json!({ "success": false, "message": message }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.body["success"] == Value::Bool(true)
    }

    pub fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        let headers = std::iter::once(("Content-Type", JSON_CONTENT_TYPE))
            .chain(SECURITY_HEADERS)
            .filter_map(|(name, value)| Header::from_bytes(name, value).ok());

        headers.fold(
            Response::from_data(self.body.to_string()).with_status_code(self.status),
            |response, header| response.with_header(header),
        )
    }
}
