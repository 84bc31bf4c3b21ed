//! Intent Router module for normalising commands and button taps

use teloxide::types::ChatId;
use tracing::debug;

/// Callback tags carried by the start-menu buttons
pub const TAG_LATEST: &str = "latest";
pub const TAG_TRENDING: &str = "trending";
pub const TAG_UPCOMING: &str = "upcoming";
pub const TAG_SEARCH: &str = "search";

/// An inbound event stripped of transport details
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// A text message, possibly a `/command`
    Command {
        chat_id: ChatId,
        text: String,
        first_name: Option<String>,
        /// This bot's username, used to ignore `/cmd@OtherBot`
        bot_username: Option<String>,
    },
    /// An inline keyboard tap
    Button { chat_id: ChatId, tag: String },
}

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentKind {
    Start { first_name: Option<String> },
    Latest,
    Trending,
    Upcoming,
    /// Raw query text, possibly empty
    Search(String),
    Help,
    /// The search button was tapped; reply with usage instead of searching
    SearchPrompt,
}

/// A routed request bound to its originating chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    pub chat_id: ChatId,
    pub kind: IntentKind,
}

/// Map an inbound event to an [`Intent`].
///
/// Returns `None` for plain text, unknown commands, commands addressed to
/// another bot and unknown button tags.
pub fn route(event: &InboundEvent) -> Option<Intent> {
    let (chat_id, kind) = match event {
        InboundEvent::Command {
            chat_id,
            text,
            first_name,
            bot_username,
        } => (
            *chat_id,
            route_command(text, first_name.as_deref(), bot_username.as_deref())?,
        ),
        InboundEvent::Button { chat_id, tag } => (*chat_id, route_button(tag)?),
    };

    debug!(chat_id = %chat_id, intent = ?kind, "Routed inbound event");
    Some(Intent { chat_id, kind })
}

/// A `/name@bot args` command split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Lowercase command name
    pub name: String,
    /// The `@bot` suffix, if any
    pub mention: Option<String>,
    /// Argument text with whitespace normalised
    pub args: String,
}

impl ParsedCommand {
    /// Whether the command is meant for the bot called `bot_username`.
    ///
    /// Unaddressed commands are for everyone; Telegram usernames compare
    /// case-insensitively.
    pub fn is_addressed_to(&self, bot_username: Option<&str>) -> bool {
        match (&self.mention, bot_username) {
            (None, _) => true,
            (Some(mention), Some(username)) => mention.eq_ignore_ascii_case(username),
            (Some(_), None) => false,
        }
    }
}

/// Split `/name@bot args` into a [`ParsedCommand`]
pub fn parse_command(text: &str) -> Option<ParsedCommand> {
    let text = text.trim_start();
    let rest = text.strip_prefix('/')?;

    let (head, args) = match rest.split_once(char::is_whitespace) {
        Some((head, args)) => (head, args),
        None => (rest, ""),
    };
    let (name, mention) = match head.split_once('@') {
        Some((name, mention)) => (name, Some(mention.to_string())),
        None => (head, None),
    };
    if name.is_empty() {
        return None;
    }

    Some(ParsedCommand {
        name: name.to_lowercase(),
        mention,
        args: args.split_whitespace().collect::<Vec<_>>().join(" "),
    })
}

fn route_command(
    text: &str,
    first_name: Option<&str>,
    bot_username: Option<&str>,
) -> Option<IntentKind> {
    let command = parse_command(text)?;
    if !command.is_addressed_to(bot_username) {
        debug!(command = %command.name, mention = ?command.mention, "Command addressed to another bot");
        return None;
    }

    match command.name.as_str() {
        "start" => Some(IntentKind::Start {
            first_name: first_name.map(str::to_string),
        }),
        "latest" => Some(IntentKind::Latest),
        "trending" => Some(IntentKind::Trending),
        "upcoming" => Some(IntentKind::Upcoming),
        "search" => Some(IntentKind::Search(command.args)),
        "help" => Some(IntentKind::Help),
        _ => None,
    }
}

fn route_button(tag: &str) -> Option<IntentKind> {
    match tag {
        TAG_LATEST => Some(IntentKind::Latest),
        TAG_TRENDING => Some(IntentKind::Trending),
        TAG_UPCOMING => Some(IntentKind::Upcoming),
        TAG_SEARCH => Some(IntentKind::SearchPrompt),
        _ => None,
    }
}
