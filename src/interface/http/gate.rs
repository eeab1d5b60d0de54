use std::collections::HashSet;

use serde::Deserialize;

/// Inbound chat message as forwarded by the relay
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub guild_id: u64,
    pub channel_id: u64,
    pub author_id: u64,
    pub content: String,
    #[serde(default)]
    pub mentions: Vec<u64>,
}

/// Authorization boundary in front of the dispatcher.
///
/// Only messages from allow-listed guilds and channels that mention the bot
/// get through; the bot's own messages never do.
#[derive(Debug, Clone)]
pub struct ChannelGate {
    bot_user_id: u64,
    allowed_guilds: HashSet<u64>,
    allowed_channels: HashSet<u64>,
}

impl ChannelGate {
    pub fn new(bot_user_id: u64, allowed_guilds: HashSet<u64>, allowed_channels: HashSet<u64>) -> Self {
        Self {
            bot_user_id,
            allowed_guilds,
            allowed_channels,
        }
    }

    /// Returns the command text with the bot's mention removed, or `None`
    /// when the message must be dropped silently.
    pub fn admit(&self, message: &ChatMessage) -> Option<String> {
        if message.author_id == self.bot_user_id {
            return None;
        }
        if !self.allowed_guilds.contains(&message.guild_id)
            || !self.allowed_channels.contains(&message.channel_id)
        {
            return None;
        }
        if !message.mentions.contains(&self.bot_user_id) {
            return None;
        }

        Some(self.strip_mention(&message.content))
    }

    fn strip_mention(&self, content: &str) -> String {
        let plain = format!("<@{}>", self.bot_user_id);
        let nick = format!("<@!{}>", self.bot_user_id);
        content
            .split_whitespace()
            .filter(|token| *token != plain && *token != nick)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
