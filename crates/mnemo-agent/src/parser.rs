//! Tool call parser — classifies one completion response.
//!
//! The model speaks a semi-reliable protocol: usually it attaches structured
//! tool-call entries, but sometimes it writes a raw pseudo-call string into
//! the text content instead (`<function=NAME{...}>`). Both shapes collapse
//! into the same [`ToolInvocation`], distinguished only by whether a
//! correlation id is present. A response with neither shape is the final
//! answer.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use mnemo_core::types::{LlmResponse, ToolInvocation};

/// Literal prefix the model emits when it writes a raw pseudo-call.
pub const PSEUDO_CALL_MARKER: &str = "<function=";

/// Substituted when a final answer arrives with empty content.
pub const EMPTY_ANSWER_PLACEHOLDER: &str = "I'm finished with the task.";

/// The classified outcome of one completion response.
#[derive(Clone, Debug, PartialEq)]
pub enum Reply {
    /// The model wants a tool executed. `call_id` is `Some` for the
    /// structured path, `None` for the pseudo-call fallback.
    Invocation(ToolInvocation),
    /// The model produced the user-facing answer.
    Final(String),
}

/// A response that looked like a tool call but couldn't be decoded.
///
/// Parse failures are recovered by the caller (folded into history as a
/// corrective message); they never abort the turn.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A structured tool call carried an undecodable argument blob.
    #[error("invalid arguments for tool `{name}`: {reason}")]
    BadArguments {
        name: String,
        call_id: String,
        reason: String,
    },

    /// The text content started with the pseudo-call marker but didn't
    /// parse as one.
    #[error("could not parse pseudo tool call: {0}")]
    BadPseudoCall(String),
}

/// Classify one completion response.
pub fn classify(response: &LlmResponse) -> Result<Reply, ParseError> {
    // Structured tool calls win over anything in the text content.
    if let Some(call) = response.tool_calls.first() {
        if response.tool_calls.len() > 1 {
            // One tool per turn-step: extra entries are dropped on purpose.
            warn!(
                count = response.tool_calls.len(),
                "response carried multiple tool calls; dispatching the first only"
            );
        }

        let arguments = decode_arguments(&call.function.arguments).map_err(|reason| {
            ParseError::BadArguments {
                name: call.function.name.clone(),
                call_id: call.id.clone(),
                reason,
            }
        })?;

        debug!(tool = %call.function.name, call_id = %call.id, "structured tool call");
        return Ok(Reply::Invocation(ToolInvocation {
            name: call.function.name.clone(),
            arguments,
            call_id: Some(call.id.clone()),
        }));
    }

    let content = response.content.as_deref().unwrap_or("");
    let trimmed = content.trim();

    if trimmed.starts_with(PSEUDO_CALL_MARKER) {
        warn!("response content is a raw pseudo-call; parsing manually");
        return parse_pseudo_call(trimmed).map(Reply::Invocation);
    }

    if trimmed.is_empty() {
        return Ok(Reply::Final(EMPTY_ANSWER_PLACEHOLDER.to_string()));
    }
    Ok(Reply::Final(content.to_string()))
}

/// Decode a text-encoded argument blob into a JSON object.
///
/// An empty blob means no arguments.
fn decode_arguments(blob: &str) -> Result<Map<String, Value>, String> {
    if blob.trim().is_empty() {
        return Ok(Map::new());
    }
    let value: Value = serde_json::from_str(blob).map_err(|e| e.to_string())?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(format!("expected a JSON object, got {other}")),
    }
}

/// Parse a pseudo-call of the shape `<function=NAME{ "arg": value, ... }>`.
///
/// The argument blob is taken as the span from the *first* `{` to the
/// *last* `}` — tolerant of nested braces inside argument values, but
/// fragile if the text carries several independent pseudo-calls or trailing
/// prose with stray braces. Known limitation, kept as-is.
fn parse_pseudo_call(text: &str) -> Result<ToolInvocation, ParseError> {
    let open = text
        .find('{')
        .ok_or_else(|| ParseError::BadPseudoCall("missing opening brace".to_string()))?;
    let close = text
        .rfind('}')
        .filter(|&close| close > open)
        .ok_or_else(|| ParseError::BadPseudoCall("missing closing brace".to_string()))?;

    let name = text[PSEUDO_CALL_MARKER.len()..open].trim();
    if name.is_empty() {
        return Err(ParseError::BadPseudoCall("missing function name".to_string()));
    }

    let blob = &text[open..=close];
    let arguments = decode_arguments(blob)
        .map_err(|reason| ParseError::BadPseudoCall(format!("bad argument blob: {reason}")))?;

    debug!(tool = %name, "parsed pseudo-call");
    Ok(ToolInvocation {
        name: name.to_string(),
        arguments,
        call_id: None,
    })
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
