// JSON handlers for the status API.
//
// Every response is JSON; failures carry the detail in a transient
// X-Poller-Error header alongside the status code.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use super::server::Ctx;
use super::state::STATE;

// HeaderName statics must be lowercase; the wire casing is irrelevant.
const ERROR_HEADER: &str = "x-poller-error";

fn json_response(value: &impl serde::Serialize) -> Response {
    match serde_json::to_string(value) {
        Ok(body) => (
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    let mut response = (status, format!("{message}\n")).into_response();

    if let Ok(value) = message.parse() {
        response.headers_mut().insert(ERROR_HEADER, value);
    }

    response
}

fn not_found(what: &str) -> Response {
    error_response(StatusCode::NOT_FOUND, &format!("{what} not found"))
}

// ── Unauthenticated probes ───────────────────────────────────────────

pub(super) async fn handle_health() -> &'static str {
    "OK"
}

pub(super) async fn handle_vars(State(ctx): State<Ctx>) -> Response {
    json_response(&serde_json::json!({
        "app": crate::APP_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": ctx.start.elapsed().as_secs(),
    }))
}

// ── Config & plugin listing ──────────────────────────────────────────

pub(super) async fn handle_config(State(ctx): State<Ctx>) -> Response {
    json_response(&serde_json::json!({
        "poller": ctx.collect.poller(),
        "inputs": ctx.collect.inputs(),
        "outputs": ctx.collect.outputs(),
        "uptime": ctx.start.elapsed().as_secs(),
    }))
}

pub(super) async fn handle_plugins(State(ctx): State<Ctx>) -> Response {
    json_response(&serde_json::json!({
        "inputs": ctx.collect.inputs(),
        "outputs": ctx.collect.outputs(),
    }))
}

// ── Input plugin views ───────────────────────────────────────────────

pub(super) async fn handle_input(Path(input): Path<String>) -> Response {
    input_view(&input, "", "")
}

pub(super) async fn handle_input_sub(Path((input, sub)): Path<(String, String)>) -> Response {
    input_view(&input, &sub, "")
}

pub(super) async fn handle_input_sub_value(
    Path((input, sub, value)): Path<(String, String, String)>,
) -> Response {
    input_view(&input, &sub, &value)
}

fn input_view(name: &str, sub: &str, value: &str) -> Response {
    let Some(record) = STATE.input(name) else {
        return not_found("input plugin");
    };

    let record = record.read().expect("lock poisoned");

    match sub {
        "" => json_response(&*record),
        "config" => json_response(&record.config),
        "sites" => json_response(&record.sites),
        "devices" => json_response(&record.devices),
        "clients" => json_response(&record.clients),
        "events" => {
            if value.is_empty() {
                json_response(&record.events)
            } else {
                // Value filters event groups by prefix.
                let groups: std::collections::BTreeMap<_, _> = record
                    .events
                    .iter()
                    .filter(|(k, _)| k.starts_with(value))
                    .collect();
                json_response(&groups)
            }
        }
        "counters" => {
            if value.is_empty() {
                json_response(&record.counters)
            } else {
                match record.counters.get(value) {
                    Some(count) => json_response(count),
                    None => not_found("counter"),
                }
            }
        }
        _ => not_found("input view"),
    }
}

// ── Output plugin views ──────────────────────────────────────────────

pub(super) async fn handle_output(Path(output): Path<String>) -> Response {
    output_view(&output, "", "")
}

pub(super) async fn handle_output_sub(Path((output, sub)): Path<(String, String)>) -> Response {
    output_view(&output, &sub, "")
}

pub(super) async fn handle_output_sub_value(
    Path((output, sub, value)): Path<(String, String, String)>,
) -> Response {
    output_view(&output, &sub, &value)
}

fn output_view(name: &str, sub: &str, value: &str) -> Response {
    let Some(record) = STATE.output(name) else {
        return not_found("output plugin");
    };

    let record = record.read().expect("lock poisoned");

    match sub {
        "" => json_response(&*record),
        "config" => json_response(&record.config),
        "events" => json_response(&record.events),
        "counters" => {
            if value.is_empty() {
                json_response(&record.counters)
            } else {
                match record.counters.get(value) {
                    Some(count) => json_response(count),
                    None => not_found("counter"),
                }
            }
        }
        _ => not_found("output view"),
    }
}
