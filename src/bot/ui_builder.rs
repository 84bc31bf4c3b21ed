//! UI Builder module for creating keyboards and static messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use super::intent_router::{TAG_LATEST, TAG_SEARCH, TAG_TRENDING, TAG_UPCOMING};

pub const FETCH_FAILED_MESSAGE: &str =
    "❌ Sorry, I couldn't fetch movie data at the moment. Please try again later.";
pub const SEARCH_USAGE_MESSAGE: &str = "Please provide a movie name. Example: /search Avengers";
pub const SEARCH_BUTTON_MESSAGE: &str = "Use the command: /search <movie_name>";

/// Commands advertised in the platform command menu
pub const COMMAND_DESCRIPTIONS: [(&str, &str); 6] = [
    ("start", "Start the bot and see main menu"),
    ("latest", "Get latest movie releases"),
    ("trending", "See trending movies this week"),
    ("upcoming", "Check upcoming movies"),
    ("search", "Search for a specific movie"),
    ("help", "Show the help message"),
];

/// Plain-text welcome shown on `/start`
pub fn welcome_message(first_name: Option<&str>) -> String {
    let greeting = match first_name {
        Some(name) if !name.trim().is_empty() => {
            format!("🎬 Welcome to Movie Updates Bot, {}!", name.trim())
        }
        _ => "🎬 Welcome to Movie Updates Bot!".to_string(),
    };

    format!(
        "{greeting}\n\n\
         I'll keep you updated with the latest movie information including:\n\
         • New Releases\n\
         • Ratings & Reviews\n\
         • Release Dates\n\
         • Movie Descriptions\n\
         • And much more!\n\n\
         Available Commands:\n\
         /start - Show this welcome message\n\
         /latest - Get latest movie updates\n\
         /trending - Trending movies this week\n\
         /upcoming - Upcoming movies\n\
         /search <movie_name> - Search for a specific movie"
    )
}

/// HTML help text
pub fn help_message() -> String {
    "🤖 <b>Movie Bot Help</b>\n\n\
     <b>Commands:</b>\n\
     /start - Start the bot and see main menu\n\
     /latest - Get latest movie releases\n\
     /trending - See trending movies this week\n\
     /upcoming - Check upcoming movies\n\
     /search &lt;movie_name&gt; - Search for a specific movie\n\
     /help - Show this help message\n\n\
     <b>Features:</b>\n\
     • Latest movie updates\n\
     • Ratings and reviews\n\
     • Release dates\n\
     • Movie descriptions\n\
     • High-quality posters\n\n\
     Just click the buttons or use commands to explore!"
        .to_string()
}

/// Reply for a search that matched nothing
pub fn no_results_message(query: &str) -> String {
    format!("No movies found for '{query}'")
}

/// Create the start-menu keyboard, one shortcut per row
pub fn create_main_menu_keyboard() -> InlineKeyboardMarkup {
    let buttons = [
        ("🎯 Latest Movies", TAG_LATEST),
        ("🔥 Trending", TAG_TRENDING),
        ("📅 Upcoming", TAG_UPCOMING),
        ("🔍 Search Movie", TAG_SEARCH),
    ]
    .into_iter()
    .map(|(label, tag)| vec![InlineKeyboardButton::callback(label, tag)])
    .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(buttons)
}
