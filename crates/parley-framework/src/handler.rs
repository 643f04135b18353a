//! Handler plumbing.
//!
//! A handler is any `Fn(&S, Arguments, &IncomingMessage) -> R` where `S` is
//! the bot's state type and `R` converts into a [`Response`]. Handlers are
//! usually methods on `S`:
//!
//! ```rust,ignore
//! struct MyBot;
//!
//! impl MyBot {
//!     fn ping(&self, _args: Arguments, _msg: &IncomingMessage) -> &'static str {
//!         "pong"
//!     }
//! }
//!
//! let bot = Bot::builder(MyBot).command("ping", MyBot::ping).build();
//! ```

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use parley_core::{IncomingMessage, Response};

use crate::error::{DispatchError, DispatchResult};

// =============================================================================
// Arguments
// =============================================================================

/// What a handler receives as its first parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arguments {
    /// Tokens following the command name.
    Tokens(Vec<String>),
    /// The whole raw text, given to the wildcard handler.
    Text(String),
}

impl Arguments {
    /// Returns the tokens, or an empty slice for raw text.
    pub fn tokens(&self) -> &[String] {
        match self {
            Self::Tokens(tokens) => tokens,
            Self::Text(_) => &[],
        }
    }

    /// Returns the raw text, if this is the wildcard form.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Tokens(_) => None,
            Self::Text(text) => Some(text),
        }
    }

    /// Returns the token at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens().get(index).map(String::as_str)
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens().len()
    }

    /// Returns `true` when there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens().is_empty()
    }

    /// Joins the tokens back with single spaces, or returns the raw text.
    pub fn joined(&self) -> String {
        match self {
            Self::Tokens(tokens) => tokens.join(" "),
            Self::Text(text) => text.clone(),
        }
    }

    /// Consumes the arguments, returning the tokens.
    pub fn into_tokens(self) -> Vec<String> {
        match self {
            Self::Tokens(tokens) => tokens,
            Self::Text(_) => Vec::new(),
        }
    }
}

impl From<Vec<String>> for Arguments {
    fn from(tokens: Vec<String>) -> Self {
        Self::Tokens(tokens)
    }
}

// =============================================================================
// Boxed handlers
// =============================================================================

/// A type-erased handler bound to state `S`.
pub type BoxedHandler<S> =
    Arc<dyn Fn(&S, Arguments, &IncomingMessage) -> Response + Send + Sync + 'static>;

/// Erases a handler's return type.
pub fn into_handler<S, F, R>(handler: F) -> BoxedHandler<S>
where
    S: 'static,
    F: Fn(&S, Arguments, &IncomingMessage) -> R + Send + Sync + 'static,
    R: Into<Response>,
{
    Arc::new(move |state: &S, args: Arguments, message: &IncomingMessage| {
        handler(state, args, message).into()
    })
}

/// Calls a handler, converting a panic into [`DispatchError::HandlerPanicked`].
pub(crate) fn invoke<S>(
    command: &str,
    handler: &BoxedHandler<S>,
    state: &S,
    args: Arguments,
    message: &IncomingMessage,
) -> DispatchResult<Response> {
    catch_unwind(AssertUnwindSafe(|| handler(state, args, message))).map_err(|payload| {
        DispatchError::HandlerPanicked {
            command: command.to_string(),
            message: panic_message(payload.as_ref()),
        }
    })
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        base: usize,
    }

    impl Counter {
        fn count(&self, args: Arguments, _msg: &IncomingMessage) -> String {
            (self.base + args.len()).to_string()
        }

        fn quiet(&self, _args: Arguments, _msg: &IncomingMessage) {}

        fn explode(&self, _args: Arguments, _msg: &IncomingMessage) -> String {
            panic!("kaboom")
        }
    }

    fn message() -> IncomingMessage {
        IncomingMessage::new("u", "c", "text")
    }

    #[test]
    fn test_arguments_tokens() {
        let args = Arguments::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(args.len(), 2);
        assert_eq!(args.get(1), Some("b"));
        assert_eq!(args.get(2), None);
        assert_eq!(args.text(), None);
        assert_eq!(args.joined(), "a b");
    }

    #[test]
    fn test_arguments_text() {
        let args = Arguments::Text("hello world".to_string());
        assert!(args.is_empty());
        assert_eq!(args.text(), Some("hello world"));
        assert_eq!(args.joined(), "hello world");
        assert!(args.into_tokens().is_empty());
    }

    #[test]
    fn test_method_as_handler() {
        let handler = into_handler(Counter::count);
        let state = Counter { base: 10 };
        let args = Arguments::Tokens(vec!["x".into(), "y".into()]);

        let response = invoke("count", &handler, &state, args, &message()).unwrap();
        assert!(matches!(response, Response::Text(ref s) if s == "12"));
    }

    #[test]
    fn test_unit_return_is_none() {
        let handler = into_handler(Counter::quiet);
        let state = Counter { base: 0 };
        let response = invoke("quiet", &handler, &state, Arguments::Tokens(vec![]), &message())
            .unwrap();
        assert!(response.is_none());
    }

    #[test]
    fn test_panic_is_caught() {
        let handler = into_handler(Counter::explode);
        let state = Counter { base: 0 };
        let err = invoke("explode", &handler, &state, Arguments::Tokens(vec![]), &message())
            .unwrap_err();

        let DispatchError::HandlerPanicked { command, message } = err;
        assert_eq!(command, "explode");
        assert_eq!(message, "kaboom");
    }

    #[test]
    fn test_formatted_panic_message() {
        fn bad_arg(_: &(), args: Arguments, _: &IncomingMessage) -> String {
            panic!("bad arg {}", args.joined())
        }

        let handler = into_handler(bad_arg);
        let args = Arguments::Tokens(vec!["7".into()]);
        let err = invoke("x", &handler, &(), args, &message()).unwrap_err();
        assert!(err.to_string().contains("bad arg 7"));
    }
}
