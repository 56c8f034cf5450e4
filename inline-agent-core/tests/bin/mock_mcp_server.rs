//! Hotel-reservations MCP server used by the integration tests
//!
//! Speaks newline-delimited JSON-RPC on stdio and answers `initialize`,
//! `tools/list` and `tools/call` for three tools:
//! - check_availability: reports free rooms for a stay
//! - book_room: returns a confirmation code
//! - cancel_booking: always reports a tool error

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{BufRead, Write};

const METHOD_NOT_FOUND: i32 = -32601;
const PARSE_ERROR: i32 = -32700;

#[derive(Debug, Deserialize)]
struct Request {
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Serialize)]
struct Response {
    jsonrpc: &'static str,
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<Value>,
}

impl Response {
    fn ok(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn err(id: Option<Value>, code: i32, message: String) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(json!({"code": code, "message": message})),
        }
    }
}

fn tool_catalog() -> Value {
    json!({
        "tools": [
            {
                "name": "check_availability",
                "description": "Check which rooms are free for a stay",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "check_in": {"type": "string", "description": "Arrival date, YYYY-MM-DD"},
                        "nights": {"type": "integer", "description": "Length of stay"}
                    },
                    "required": ["check_in", "nights"]
                }
            },
            {
                "name": "book_room",
                "description": "Book a room for a guest",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "guest": {"type": "string", "description": "Guest name"},
                        "room_type": {"type": ["string", "null"], "description": "single or double"}
                    },
                    "required": ["guest"]
                }
            },
            {
                "name": "cancel_booking",
                "description": "Cancel an existing booking",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "confirmation": {"type": "string"}
                    },
                    "required": ["confirmation"]
                }
            }
        ]
    })
}

fn text_result(text: String, is_error: bool) -> Value {
    json!({
        "content": [{"type": "text", "text": text}],
        "isError": is_error
    })
}

fn call_tool(id: Option<Value>, params: &Value) -> Response {
    let name = params["name"].as_str().unwrap_or_default();
    let args = &params["arguments"];

    match name {
        "check_availability" => {
            let nights = args["nights"].as_i64().unwrap_or(1);
            let free = if nights > 7 { 0 } else { 3 };
            let check_in = args["check_in"].as_str().unwrap_or("?");
            let text = format!("{} rooms free from {}", free, check_in);
            Response::ok(id, text_result(text, false))
        }
        "book_room" => {
            let guest = args["guest"].as_str().unwrap_or_default();
            let room_type = args["room_type"].as_str().unwrap_or("single");
            let text = format!("Booked {} room for {}: HTL-0042", room_type, guest);
            Response::ok(id, text_result(text, false))
        }
        "cancel_booking" => Response::ok(
            id,
            text_result("Cancellations are closed".to_string(), true),
        ),
        other => Response::err(id, METHOD_NOT_FOUND, format!("Unknown tool: {}", other)),
    }
}

fn handle(request: Request) -> Option<Response> {
    match request.method.as_str() {
        "initialize" => Some(Response::ok(
            request.id,
            json!({
                "protocolVersion": "2024-11-05",
                "serverInfo": {"name": "hotel-reservations", "version": "0.1.0"},
                "capabilities": {"tools": {}}
            }),
        )),
        "tools/list" => Some(Response::ok(request.id, tool_catalog())),
        "tools/call" => Some(call_tool(request.id, &request.params)),
        method if method.starts_with("notifications/") => None,
        method => Some(Response::err(
            request.id,
            METHOD_NOT_FOUND,
            format!("Method not found: {}", method),
        )),
    }
}

fn main() {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();

    for line in stdin.lock().lines().map_while(Result::ok) {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handle(request),
            Err(e) => {
                let message = format!("Parse error: {e}");
                Some(Response::err(None, PARSE_ERROR, message))
            }
        };

        let Some(response) = response else { continue };
        let Ok(encoded) = serde_json::to_string(&response) else {
            continue;
        };
        let written = writeln!(stdout, "{}", encoded).and_then(|_| stdout.flush());
        if written.is_err() {
            break;
        }
    }
}
