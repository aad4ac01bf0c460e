// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[test]
fn created_round_trip() {
    let json = Response::created().to_json().unwrap();
    assert_eq!(json, r#"{"status":201}"#);

    let parsed = Response::from_slice(json.as_bytes()).unwrap();
    assert!(parsed.is_created());
}

#[parameterized(
    bad_request = { r#"{"status":400}"#, 400 },
    server_error = { r#"{"status":500}"#, 500 },
    ok_is_not_created = { r#"{"status":200}"#, 200 },
    extra_fields = { r#"{"status":409,"message":"dup"}"#, 409 },
)]
fn non_created_status_is_not_accepted(input: &str, status: u16) {
    let parsed = Response::from_slice(input.as_bytes()).unwrap();
    assert_eq!(parsed.status, status);
    assert!(!parsed.is_created());
}

#[parameterized(
    empty = { "" },
    missing_status = { "{}" },
    wrong_type = { r#"{"status":"201"}"# },
    not_json = { "created" },
)]
fn malformed_response_fails_to_parse(input: &str) {
    assert!(Response::from_slice(input.as_bytes()).is_err());
}

#[test]
fn rejection_constructors() {
    assert_eq!(Response::bad_request().to_json().unwrap(), r#"{"status":400}"#);
    assert_eq!(Response::internal_error().status, STATUS_INTERNAL_ERROR);
    assert!(!Response::internal_error().is_created());
}
