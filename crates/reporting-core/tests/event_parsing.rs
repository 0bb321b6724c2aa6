//! Update body parsing and response body shape.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use reporting_core::protocol::{parse_update_body, TicketEvent, TicketSummary, UpdateOutcome};
use reporting_core::{ClientCode, ReportError};

#[test]
fn parse_known_events() {
    let ev = parse_update_body(br#"{"event":"ticket_created"}"#).unwrap();
    assert_eq!(ev, TicketEvent::Created);

    let ev = parse_update_body(br#"{"event":"ticket_closed","source":"ticket-service"}"#).unwrap();
    assert_eq!(ev, TicketEvent::Closed);
}

#[test]
fn unknown_missing_or_mistyped_event_is_invalid_event() {
    for body in [
        r#"{"event":"bogus"}"#,
        r#"{"event":null}"#,
        r#"{"event":42}"#,
        r#"{}"#,
        r#"{"Event":"ticket_created"}"#,
    ] {
        let err = parse_update_body(body.as_bytes()).expect_err(body);
        assert_eq!(err.client_code(), ClientCode::InvalidEvent, "{body}");
        assert_eq!(err.client_code().public_message(), "Invalid event type");
    }
}

#[test]
fn non_object_or_broken_json_is_bad_request() {
    for body in ["", "not json", "{\"event\":", "[\"ticket_created\"]", "\"ticket_created\""] {
        let err = parse_update_body(body.as_bytes()).expect_err(body);
        assert_eq!(err.client_code(), ClientCode::BadRequest, "{body}");
        assert_eq!(err.client_code().public_message(), "Invalid request body");
    }
}

#[test]
fn summary_treats_missing_counters_as_zero() {
    let s = TicketSummary::from_counts(None, Some(4));
    assert_eq!(s.open_tickets, 0);
    assert_eq!(s.closed_tickets, 4);
    assert_eq!(s.total_tickets, 4);
}

#[test]
fn summary_body_shape() {
    let s = TicketSummary::from_counts(Some(2), Some(3));
    let v = serde_json::to_value(s).unwrap();
    assert_eq!(
        v,
        serde_json::json!({"open_tickets": 2, "closed_tickets": 3, "total_tickets": 5})
    );
}

#[test]
fn update_body_shape() {
    let v = serde_json::to_value(UpdateOutcome::opened(1)).unwrap();
    assert_eq!(v, serde_json::json!({"status": "success", "open_tickets": 1}));

    let v = serde_json::to_value(UpdateOutcome::closed(7)).unwrap();
    assert_eq!(v, serde_json::json!({"status": "success", "closed_tickets": 7}));
}

#[test]
fn config_errors_are_server_side() {
    let err = ReportError::Config("store.port must be between 1 and 65535".into());
    assert_eq!(err.client_code(), ClientCode::Internal);
    assert_eq!(err.client_code().as_str(), "INTERNAL");
}
