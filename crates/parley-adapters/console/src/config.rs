//! Configuration types for the console adapter.
//!
//! Loaded from the `adapters.console` section of `parley.toml`:
//!
//! ```toml
//! [adapters.console]
//! bot_name = "parley"
//! bot_id = "1"
//! user_id = "100"
//! user_name = "you"
//! channel = "console"
//! voice_channel = "lounge"   # omit to simulate a user outside voice
//! ```

use serde::{Deserialize, Serialize};

/// Console adapter configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Name the bot reports on ready; `@bot_name` mentions it.
    pub bot_name: String,

    /// Id the bot reports on ready; `<@bot_id>` mentions it.
    pub bot_id: String,

    /// Author id given to typed lines.
    pub user_id: String,

    /// Author display name given to typed lines.
    pub user_name: String,

    /// Channel typed lines are posted in.
    pub channel: String,

    /// Voice channel the typing user is connected to.
    pub voice_channel: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            bot_name: "parley".into(),
            bot_id: "1".into(),
            user_id: "100".into(),
            user_name: "you".into(),
            channel: "console".into(),
            voice_channel: None,
        }
    }
}

impl ConsoleConfig {
    /// Checks the fields the adapter cannot run without.
    pub fn validate(&self) -> Result<(), String> {
        if self.bot_id.is_empty() {
            return Err("bot_id must not be empty".into());
        }
        if self.user_id == self.bot_id {
            // Every typed line would be dropped as the bot's own message.
            return Err(format!("user_id must differ from bot_id ('{}')", self.bot_id));
        }
        if self.channel.is_empty() {
            return Err("channel must not be empty".into());
        }
        Ok(())
    }
}
