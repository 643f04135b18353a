//! Trigger classification.
//!
//! Decides whether a message is addressed to the bot and, if so, which
//! command it names. The forms are tried in order and the first match wins:
//!
//! | Kind | Example (bot `parley`, id `42`, prefix `.`) |
//! |---|---|
//! | [`TriggerKind::NameMention`] | `@parley roll 2 6` |
//! | [`TriggerKind::IdMention`] | `<@42> roll 2 6` or `<@!42> roll 2 6` |
//! | [`TriggerKind::BareName`] | `parley roll 2 6` |
//! | [`TriggerKind::Prefix`] | `.roll 2 6` (only if `roll` is registered) |
//!
//! Tokens are split on single spaces. There is no quoting and repeated
//! spaces produce empty tokens, so `".roll  6"` yields the arguments
//! `["", "6"]`.
//!
//! Matching is a literal prefix test on the raw text. A message that merely
//! starts with the bot's display name is treated as addressed to it.

use std::fmt;

use parley_core::BotIdentity;

/// Which form addressed the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    /// `@name command args...`
    NameMention,
    /// `<@id> command args...`
    IdMention,
    /// `name command args...`
    BareName,
    /// `{prefix}command args...`
    Prefix,
}

impl TriggerKind {
    /// Returns `true` for the three mention forms.
    pub fn is_mention(self) -> bool {
        !matches!(self, Self::Prefix)
    }

    /// Short tag used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NameMention => "name_mention",
            Self::IdMention => "id_mention",
            Self::BareName => "bare_name",
            Self::Prefix => "prefix",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    /// The form that matched.
    pub kind: TriggerKind,
    /// The command name, absent when a mention carries nothing after it.
    pub command: Option<String>,
    /// The argument tokens after the command name.
    pub args: Vec<String>,
}

impl Trigger {
    fn from_mention(kind: TriggerKind, text: &str) -> Self {
        let mut tokens = tokenize(text).skip(1);
        let command = tokens.next().map(str::to_string);
        Self {
            kind,
            command,
            args: tokens.map(str::to_string).collect(),
        }
    }
}

/// Splits text on single spaces, keeping empty tokens.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(' ')
}

/// Extracts the command name a prefixed message would invoke.
///
/// Returns the first token with the first `prefix.len()` bytes removed, or
/// `None` when the text does not start with `prefix`.
pub fn prefixed_command<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let first = tokenize(text).next()?;
    first.strip_prefix(prefix)
}

/// Classifies `text`.
///
/// `identity` is the bot's own identity; until it is known only the prefix
/// form is considered. `is_registered` decides whether a prefixed command is
/// accepted.
///
/// # Example
///
/// ```rust
/// use parley_core::BotIdentity;
/// use parley_framework::trigger::{TriggerKind, classify};
///
/// let me = BotIdentity::new("parley", "42");
/// let trigger = classify("<@42> roll 2 6", Some(&me), ".", |_| false).unwrap();
///
/// assert_eq!(trigger.kind, TriggerKind::IdMention);
/// assert_eq!(trigger.command.as_deref(), Some("roll"));
/// assert_eq!(trigger.args, vec!["2", "6"]);
///
/// // Unknown prefixed commands are not triggers at all.
/// assert!(classify(".nope", Some(&me), ".", |_| false).is_none());
/// ```
pub fn classify(
    text: &str,
    identity: Option<&BotIdentity>,
    prefix: &str,
    is_registered: impl Fn(&str) -> bool,
) -> Option<Trigger> {
    if let Some(identity) = identity
        && let Some(kind) = mention_kind(text, identity)
    {
        return Some(Trigger::from_mention(kind, text));
    }

    let command = prefixed_command(text, prefix)?;
    if !is_registered(command) {
        return None;
    }

    Some(Trigger {
        kind: TriggerKind::Prefix,
        command: Some(command.to_string()),
        args: tokenize(text).skip(1).map(str::to_string).collect(),
    })
}

fn mention_kind(text: &str, identity: &BotIdentity) -> Option<TriggerKind> {
    let named = !identity.name.is_empty();

    if named && text.starts_with(&identity.name_mention()) {
        return Some(TriggerKind::NameMention);
    }
    if identity
        .id_mentions()
        .iter()
        .any(|mention| text.starts_with(mention.as_str()))
    {
        return Some(TriggerKind::IdMention);
    }
    if named && text.starts_with(&identity.name) {
        return Some(TriggerKind::BareName);
    }
    None
}
