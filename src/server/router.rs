// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use serde_json::{json, Value};
use tiny_http::Method;

use crate::rule::parse_rules;

use super::{reply::Reply, App};

pub const CONVERT: &str = "/convert";
pub const SAVE_RULES: &str = "/save-user-rules";
pub const GET_RULES: &str = "/get-user-rules";

/// Route one request. `url` may carry a query string, which is ignored.
pub fn dispatch(app: &App, method: &Method, url: &str, body: &[u8]) -> Reply {
    let path = url.split('?').next().unwrap_or_default();
    match (method, path) {
        (Method::Post, CONVERT) => with_json(body, |request| convert(app, request)),
        (Method::Post, SAVE_RULES) => with_json(body, |request| save_rules(app, request)),
        (Method::Get, GET_RULES) => get_rules(app),
        (_, CONVERT | SAVE_RULES | GET_RULES) => Reply::failure(405, "Method not allowed"),
        _ => Reply::failure(404, "Not found"),
    }
}

/// Parse the body as JSON and hand it to `handler`. An empty body is `{}`.
fn with_json<F: FnOnce(&Value) -> Reply>(body: &[u8], handler: F) -> Reply {
    if body.iter().all(u8::is_ascii_whitespace) {
        return handler(&json!({}));
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(request) => handler(&request),
        Err(_) => Reply::failure(400, "Invalid JSON body"),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

fn convert(app: &App, request: &Value) -> Reply {
    let converted = panic::catch_unwind(AssertUnwindSafe(|| {
        app.converter.convert_request(request)
    }));

    match converted {
        Ok(html) => Reply::ok(json!({ "success": true, "result": html })),
        Err(payload) => {
            color_print::ceprintln!(
                "<r>[convert] Error: conversion panicked: {}</>",
                panic_message(payload.as_ref())
            );
            Reply::failure(500, "Conversion error")
        }
    }
}

fn save_rules(app: &App, request: &Value) -> Reply {
    let payload = request.get("rules").unwrap_or(&Value::Null);
    let Some(rules) = parse_rules(payload, app.converter.rule_limits()) else {
        return Reply::failure(400, "Rules must be an array");
    };

    match app.store.save(rules) {
        Ok(saved) => {
            color_print::cprintln!("<g>[rules]</> Saved {} rules", saved.len());
            Reply::ok(json!({ "success": true, "rules": saved }))
        }
        Err(err) => {
            color_print::ceprintln!("<r>[rules] Error: {:?}</>", err);
            Reply::failure(500, "Failed to save rules")
        }
    }
}

fn get_rules(app: &App) -> Reply {
    Reply::ok(json!({ "success": true, "rules": app.store.load() }))
}
