//! Turn controller — the per-turn state machine.
//!
//! One turn drives a user input to a final answer by looping:
//! call the completion service, route the response through the parser,
//! dispatch at most one tool, fold the result back into history, repeat.
//! The loop suspends only at the two service calls; parsing and history
//! mutation are synchronous.
//!
//! Termination: a final-answer response, a completion-service failure
//! (fixed apology, never retried), an interrupt between iterations, or the
//! iteration cap (forced final message).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use mnemo_core::session::SessionState;
use mnemo_core::types::{LlmResponse, Message, ToolDefinition};
use mnemo_providers::{CompletionProvider, RequestConfig};
use mnemo_tools::ToolService;

use crate::dispatch::ToolDispatcher;
use crate::parser::{self, ParseError, Reply};

/// Returned when the completion service itself fails. Terminal for the turn.
pub const COMPLETION_FAILURE_MESSAGE: &str =
    "Sorry, I had a problem communicating with my brain. Please try again.";

/// Forced final answer when the iteration cap is exhausted.
pub const STEP_LIMIT_MESSAGE: &str =
    "I couldn't finish working on that within my step limit. Please try rephrasing the request.";

/// Returned when the turn is interrupted between iterations.
pub const INTERRUPTED_MESSAGE: &str = "Okay, I've stopped working on that.";

/// Default maximum completion ↔ tool iterations per turn.
pub const DEFAULT_MAX_ITERATIONS: u32 = 20;

// ─────────────────────────────────────────────
// Interrupt handle
// ─────────────────────────────────────────────

/// External interrupt for a running turn.
///
/// Honored between iterations only — an in-flight tool call is allowed to
/// finish on its own terms.
#[derive(Clone, Default)]
pub struct TurnInterrupt(Arc<AtomicBool>);

impl TurnInterrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the current turn to stop before its next iteration.
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether an interrupt has been requested.
    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear the flag (e.g. before accepting the next user input).
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// ─────────────────────────────────────────────
// TurnRunner
// ─────────────────────────────────────────────

/// Outcome of one state-machine step after a completion response arrived.
enum Step {
    /// Something was appended to history; call the completion service again.
    Continue,
    /// Terminal: the final answer text (already appended).
    Done(String),
}

/// Drives one user turn to completion.
///
/// Holds the two service handles for the life of the session. History is
/// passed in per turn and only ever grows.
pub struct TurnRunner {
    provider: Arc<dyn CompletionProvider>,
    dispatcher: ToolDispatcher,
    tool_definitions: Vec<ToolDefinition>,
    model: String,
    request_config: RequestConfig,
    max_iterations: u32,
    interrupt: Option<TurnInterrupt>,
}

impl TurnRunner {
    /// Create a turn runner.
    ///
    /// `tool_definitions` is the adapted catalog snapshot, fixed for the
    /// session's lifetime.
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        service: Arc<dyn ToolService>,
        tool_definitions: Vec<ToolDefinition>,
        model: impl Into<String>,
        request_config: RequestConfig,
        max_iterations: Option<u32>,
    ) -> Self {
        Self {
            provider,
            dispatcher: ToolDispatcher::new(service),
            tool_definitions,
            model: model.into(),
            request_config,
            max_iterations: max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
            interrupt: None,
        }
    }

    /// Attach an external interrupt handle (builder pattern).
    pub fn with_interrupt(mut self, interrupt: TurnInterrupt) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    /// Run one full turn: user input → final answer.
    ///
    /// Infallible by design — every failure mode folds into conversational
    /// content or one of the fixed terminal messages.
    pub async fn run_turn(&self, session: &mut SessionState, user_input: &str) -> String {
        session.push(Message::user(user_input));
        debug!(input = %user_input, history = session.len(), "turn started");

        for iteration in 0..self.max_iterations {
            if let Some(interrupt) = &self.interrupt {
                if interrupt.is_triggered() {
                    info!(iteration = iteration, "turn interrupted");
                    return INTERRUPTED_MESSAGE.to_string();
                }
            }

            debug!(iteration = iteration, "completion call");

            let response = match self
                .provider
                .complete(
                    session.history(),
                    Some(&self.tool_definitions),
                    &self.model,
                    &self.request_config,
                )
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    // Terminal but graceful: no retry, no exception, and no
                    // history mutation past the user message.
                    error!(error = %e, "completion service call failed");
                    return COMPLETION_FAILURE_MESSAGE.to_string();
                }
            };

            match self.step(session, response).await {
                Step::Continue => continue,
                Step::Done(answer) => return answer,
            }
        }

        warn!(max_iterations = self.max_iterations, "iteration cap exhausted");
        session.push(Message::assistant(STEP_LIMIT_MESSAGE));
        STEP_LIMIT_MESSAGE.to_string()
    }

    /// Route one completion response: dispatch a tool or finish the turn.
    async fn step(&self, session: &mut SessionState, response: LlmResponse) -> Step {
        match parser::classify(&response) {
            Ok(Reply::Final(answer)) => {
                session.push(Message::assistant(answer.clone()));
                Step::Done(answer)
            }

            Ok(Reply::Invocation(invocation)) => {
                match invocation.call_id.clone() {
                    Some(call_id) => {
                        // Structured path: preserve the raw call in history so
                        // the tool result can be correlated back to it.
                        if let Some(raw_call) = response.tool_calls.first() {
                            session.push(Message::assistant_tool_calls(vec![raw_call.clone()]));
                        }

                        let result =
                            self.dispatcher.dispatch(&invocation, session.run_id()).await;
                        debug!(
                            tool = %invocation.name,
                            ok = result.ok,
                            result = %mnemo_core::utils::truncate_string(&result.content, 300),
                            "tool result"
                        );
                        session.push(Message::tool_result(
                            call_id,
                            &invocation.name,
                            result.content,
                        ));
                    }
                    None => {
                        // Fallback path: no correlation id exists, so the
                        // result is folded in as user-role prose.
                        let result =
                            self.dispatcher.dispatch(&invocation, session.run_id()).await;
                        session.push(Message::user(format!(
                            "The tool '{}' returned this result:\n{}",
                            invocation.name, result.content
                        )));
                    }
                }
                Step::Continue
            }

            Err(ParseError::BadArguments {
                name,
                call_id,
                reason,
            }) => {
                // The call itself is well-formed enough to correlate; report
                // the decode failure through the normal tool-result channel.
                if let Some(raw_call) = response.tool_calls.first() {
                    session.push(Message::assistant_tool_calls(vec![raw_call.clone()]));
                }
                session.push(Message::tool_result(
                    call_id,
                    &name,
                    format!("{name} failed: invalid arguments: {reason}"),
                ));
                Step::Continue
            }

            Err(e @ ParseError::BadPseudoCall(_)) => {
                warn!(error = %e, "pseudo-call parse failed");
                session.push(Message::user(format!(
                    "I tried to call a tool but failed: {e}"
                )));
                Step::Continue
            }
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
