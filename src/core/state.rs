//! The view's state as an immutable record plus pure transitions.
//!
//! Every change goes through [`ViewState::apply`], which returns a new record
//! and leaves the old one untouched. Network outcomes arrive as [`ViewEvent`]s
//! from the session's queue; local edits are applied directly by the caller.

use serde_json::Value;
use tracing::debug;

use crate::core::api::ApiError;

/// Which backend call produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Greeting,
    Echo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewError {
    pub operation: Operation,
    pub error: ApiError,
}

#[derive(Debug, Clone)]
pub enum ViewEvent {
    GreetingRequested,
    GreetingLoaded(Result<String, ApiError>),
    InputChanged(String),
    EchoRequested { seq: u64 },
    EchoLoaded { seq: u64, result: Result<Value, ApiError> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub greeting: String,
    pub input: String,
    pub echo: Option<Value>,
    pub last_error: Option<ViewError>,
    pub awaiting_greeting: bool,
    /// Highest echo sequence number issued so far.
    pub echo_issued: u64,
    /// Sequence number of the last echo outcome that was applied.
    pub echo_applied: u64,
}

impl ViewState {
    pub fn new(default_text: impl Into<String>) -> Self {
        Self {
            greeting: String::new(),
            input: default_text.into(),
            echo: None,
            last_error: None,
            awaiting_greeting: false,
            echo_issued: 0,
            echo_applied: 0,
        }
    }

    #[must_use]
    pub fn apply(&self, event: ViewEvent) -> Self {
        match event {
            ViewEvent::GreetingRequested => self.on_greeting_requested(),
            ViewEvent::GreetingLoaded(result) => self.on_greeting_loaded(result),
            ViewEvent::InputChanged(text) => self.on_input_changed(text),
            ViewEvent::EchoRequested { seq } => self.on_echo_requested(seq),
            ViewEvent::EchoLoaded { seq, result } => self.on_echo_loaded(seq, result),
        }
    }

    #[must_use]
    pub fn on_greeting_requested(&self) -> Self {
        Self {
            awaiting_greeting: true,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn on_greeting_loaded(&self, result: Result<String, ApiError>) -> Self {
        let mut next = self.clone();
        next.awaiting_greeting = false;
        match result {
            Ok(message) => {
                next.greeting = message;
                next.clear_error(Operation::Greeting);
            }
            Err(error) => {
                next.last_error = Some(ViewError {
                    operation: Operation::Greeting,
                    error,
                });
            }
        }
        next
    }

    #[must_use]
    pub fn on_input_changed(&self, text: String) -> Self {
        Self {
            input: text,
            ..self.clone()
        }
    }

    #[must_use]
    pub fn on_echo_requested(&self, seq: u64) -> Self {
        Self {
            echo_issued: self.echo_issued.max(seq),
            ..self.clone()
        }
    }

    /// Outcomes older than the one on screen are dropped, so a slow early
    /// request cannot overwrite the result of a later one.
    #[must_use]
    pub fn on_echo_loaded(&self, seq: u64, result: Result<Value, ApiError>) -> Self {
        let mut next = self.clone();
        next.echo_issued = next.echo_issued.max(seq);

        if seq <= self.echo_applied {
            debug!(seq, applied = self.echo_applied, "discarding stale echo outcome");
            return next;
        }
        next.echo_applied = seq;

        match result {
            Ok(value) => {
                next.echo = Some(value);
                next.clear_error(Operation::Echo);
            }
            Err(error) => {
                next.last_error = Some(ViewError {
                    operation: Operation::Echo,
                    error,
                });
            }
        }
        next
    }

    fn clear_error(&mut self, operation: Operation) {
        if self
            .last_error
            .as_ref()
            .is_some_and(|e| e.operation == operation)
        {
            self.last_error = None;
        }
    }

    pub fn echo_pending(&self) -> bool {
        self.echo_issued > self.echo_applied
    }

    pub fn is_busy(&self) -> bool {
        self.awaiting_greeting || self.echo_pending()
    }

    /// Pretty-printed echo response, or None while nothing has arrived.
    pub fn rendered_echo(&self) -> Option<String> {
        self.echo
            .as_ref()
            .map(|v| serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn boom() -> ApiError {
        ApiError::Transport("connection refused".to_string())
    }

    #[test]
    fn starts_empty_with_default_input() {
        let state = ViewState::new("Hi Flask");
        assert_eq!(state.greeting, "");
        assert_eq!(state.input, "Hi Flask");
        assert!(state.rendered_echo().is_none());
        assert!(!state.is_busy());
    }

    #[test]
    fn greeting_is_replaced_on_success() {
        let state = ViewState::new("")
            .apply(ViewEvent::GreetingRequested)
            .apply(ViewEvent::GreetingLoaded(Ok("Hello".to_string())));
        assert_eq!(state.greeting, "Hello");
        assert!(!state.awaiting_greeting);
    }

    #[test]
    fn greeting_failure_keeps_prior_value() {
        let before = ViewState::new("").apply(ViewEvent::GreetingRequested);
        let after = before.apply(ViewEvent::GreetingLoaded(Err(boom())));
        assert_eq!(after.greeting, "");
        assert!(!after.awaiting_greeting);
        assert_eq!(
            after.last_error.as_ref().map(|e| e.operation),
            Some(Operation::Greeting)
        );
    }

    #[test]
    fn apply_leaves_the_original_record_alone() {
        let before = ViewState::new("Hi Flask");
        let after = before.apply(ViewEvent::InputChanged("foo".to_string()));
        assert_eq!(before.input, "Hi Flask");
        assert_eq!(after.input, "foo");
    }

    #[test]
    fn echo_response_is_replaced_wholesale() {
        let state = ViewState::new("")
            .apply(ViewEvent::EchoRequested { seq: 1 })
            .apply(ViewEvent::EchoLoaded {
                seq: 1,
                result: Ok(json!({ "a": 1, "b": 2 })),
            })
            .apply(ViewEvent::EchoRequested { seq: 2 })
            .apply(ViewEvent::EchoLoaded {
                seq: 2,
                result: Ok(json!({ "c": 3 })),
            });
        assert_eq!(state.echo, Some(json!({ "c": 3 })));
        assert!(!state.echo_pending());
    }

    #[test]
    fn stale_echo_outcome_is_discarded() {
        let state = ViewState::new("")
            .apply(ViewEvent::EchoRequested { seq: 1 })
            .apply(ViewEvent::EchoRequested { seq: 2 })
            .apply(ViewEvent::EchoLoaded {
                seq: 2,
                result: Ok(json!({ "you_sent": "second" })),
            })
            .apply(ViewEvent::EchoLoaded {
                seq: 1,
                result: Ok(json!({ "you_sent": "first" })),
            });
        assert_eq!(state.echo, Some(json!({ "you_sent": "second" })));
        assert_eq!(state.echo_applied, 2);
        assert!(!state.is_busy());
    }

    #[test]
    fn echo_failure_keeps_prior_response() {
        let ok = ViewState::new("").apply(ViewEvent::EchoLoaded {
            seq: 1,
            result: Ok(json!({ "x": true })),
        });
        let failed = ok.apply(ViewEvent::EchoLoaded {
            seq: 2,
            result: Err(ApiError::Status {
                status: 500,
                body: String::new(),
            }),
        });
        assert_eq!(failed.echo, Some(json!({ "x": true })));
        assert_eq!(
            failed.last_error.as_ref().map(|e| e.operation),
            Some(Operation::Echo)
        );

        let recovered = failed.apply(ViewEvent::EchoLoaded {
            seq: 3,
            result: Ok(json!({ "x": false })),
        });
        assert!(recovered.last_error.is_none());
    }

    #[test]
    fn echo_success_does_not_clear_greeting_error() {
        let state = ViewState::new("")
            .apply(ViewEvent::GreetingLoaded(Err(boom())))
            .apply(ViewEvent::EchoLoaded {
                seq: 1,
                result: Ok(json!({})),
            });
        assert_eq!(
            state.last_error.map(|e| e.operation),
            Some(Operation::Greeting)
        );
    }

    #[test]
    fn outcome_before_request_bookkeeping_does_not_leave_it_pending() {
        let state = ViewState::new("")
            .apply(ViewEvent::EchoLoaded {
                seq: 1,
                result: Ok(json!(1)),
            })
            .apply(ViewEvent::EchoRequested { seq: 1 });
        assert!(!state.echo_pending());
    }

    #[test]
    fn rendered_echo_is_pretty_printed() {
        let state = ViewState::new("").apply(ViewEvent::EchoLoaded {
            seq: 1,
            result: Ok(json!({ "text": "foo" })),
        });
        assert_eq!(
            state.rendered_echo().as_deref(),
            Some("{\n  \"text\": \"foo\"\n}")
        );
    }
}
