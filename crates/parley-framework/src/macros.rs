//! Registration macros.
//!
//! [`command!`](crate::command) registers a method under its own name, so a
//! handler does not have to repeat it:
//!
//! ```rust
//! use parley_core::IncomingMessage;
//! use parley_framework::{Arguments, Bot, command, commands};
//!
//! struct Jukebox;
//!
//! impl Jukebox {
//!     fn play(&self, args: Arguments, _msg: &IncomingMessage) -> String {
//!         format!("queued {}", args.joined())
//!     }
//!
//!     fn skip(&self, _args: Arguments, _msg: &IncomingMessage) {}
//!
//!     fn audit(&self, _args: Arguments, _msg: &IncomingMessage) {}
//! }
//!
//! let builder = command!(Bot::builder(Jukebox), Jukebox::play);
//! let bot = commands!(builder,
//!     "next" => Jukebox::skip,
//!     "*" => Jukebox::audit,
//! )
//! .build();
//!
//! assert_eq!(bot.registry().commands(), vec!["next", "play"]);
//! assert!(bot.registry().wildcard().is_some());
//! ```

/// Registers one handler on a [`BotBuilder`](crate::BotBuilder).
///
/// - `command!(builder, Type::method)` registers under `"method"`.
/// - `command!(builder, "name" => handler)` registers under `"name"`;
///   `"*"` registers the wildcard.
#[macro_export]
macro_rules! command {
    ($builder:expr, $name:literal => $handler:expr) => {
        $builder.command($name, $handler)
    };
    ($builder:expr, $ty:ident :: $method:ident) => {
        $builder.command(::core::stringify!($method), $ty::$method)
    };
}

/// Registers several handlers at once, in the forms accepted by
/// [`command!`](crate::command).
#[macro_export]
macro_rules! commands {
    ($builder:expr $(,)?) => {
        $builder
    };
    ($builder:expr, $name:literal => $handler:expr $(, $($rest:tt)*)?) => {
        $crate::commands!($crate::command!($builder, $name => $handler) $(, $($rest)*)?)
    };
    ($builder:expr, $ty:ident :: $method:ident $(, $($rest:tt)*)?) => {
        $crate::commands!($crate::command!($builder, $ty::$method) $(, $($rest)*)?)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Arguments, Bot};
    use parley_core::IncomingMessage;

    struct Shop;

    impl Shop {
        fn buy(&self, args: Arguments, _msg: &IncomingMessage) -> String {
            format!("bought {}", args.len())
        }

        fn sell(&self, _args: Arguments, _msg: &IncomingMessage) -> &'static str {
            "sold"
        }
    }

    #[test]
    fn test_command_defaults_to_method_name() {
        let bot = command!(Bot::builder(Shop), Shop::buy).build();
        assert!(bot.registry().is_registered("buy"));
    }

    #[test]
    fn test_command_with_explicit_name() {
        let bot = command!(Bot::builder(Shop), "purchase" => Shop::buy).build();
        assert!(bot.registry().is_registered("purchase"));
        assert!(!bot.registry().is_registered("buy"));
    }

    #[test]
    fn test_commands_batch() {
        let bot = commands!(Bot::builder(Shop),
            Shop::buy,
            "dump" => Shop::sell,
            Shop::sell
        )
        .build();

        assert_eq!(bot.registry().commands(), vec!["buy", "dump", "sell"]);
    }

    #[test]
    fn test_empty_batch() {
        let bot = commands!(Bot::builder(Shop)).build();
        assert!(bot.registry().is_empty());
    }
}
