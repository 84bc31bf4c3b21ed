//! # Intent Router Tests

use teloxide::types::ChatId;

use movie_updates_bot::bot::{route, InboundEvent, Intent, IntentKind};

const CHAT: ChatId = ChatId(7);
const BOT_USERNAME: &str = "MovieUpdatesBot";

fn command(text: &str) -> Option<IntentKind> {
    route(&InboundEvent::Command {
        chat_id: CHAT,
        text: text.to_string(),
        first_name: Some("Grace".to_string()),
        bot_username: Some(BOT_USERNAME.to_string()),
    })
    .map(|intent| intent.kind)
}

fn button(tag: &str) -> Option<IntentKind> {
    route(&InboundEvent::Button {
        chat_id: CHAT,
        tag: tag.to_string(),
    })
    .map(|intent| intent.kind)
}

#[test]
fn test_commands_map_to_intents() {
    assert_eq!(
        command("/start"),
        Some(IntentKind::Start {
            first_name: Some("Grace".to_string())
        })
    );
    assert_eq!(command("/latest"), Some(IntentKind::Latest));
    assert_eq!(command("/trending"), Some(IntentKind::Trending));
    assert_eq!(command("/upcoming"), Some(IntentKind::Upcoming));
    assert_eq!(command("/help"), Some(IntentKind::Help));
}

#[test]
fn test_search_extracts_arguments() {
    assert_eq!(
        command("/search The Matrix"),
        Some(IntentKind::Search("The Matrix".to_string()))
    );
    assert_eq!(command("/search"), Some(IntentKind::Search(String::new())));
    assert_eq!(
        command("/search@MovieUpdatesBot   Spirited    Away"),
        Some(IntentKind::Search("Spirited Away".to_string()))
    );
}

#[test]
fn test_commands_for_other_bots_are_ignored() {
    assert_eq!(command("/latest@SomeOtherBot"), None);
    assert_eq!(command("/search@SomeOtherBot Dune"), None);
    assert_eq!(command("/latest@movieupdatesbot"), Some(IntentKind::Latest));
}

#[test]
fn test_mentioned_command_without_known_username_is_ignored() {
    let intent = route(&InboundEvent::Command {
        chat_id: CHAT,
        text: "/latest@MovieUpdatesBot".to_string(),
        first_name: None,
        bot_username: None,
    });
    assert_eq!(intent, None);
}

#[test]
fn test_commands_are_case_insensitive() {
    assert_eq!(command("/LATEST"), Some(IntentKind::Latest));
}

#[test]
fn test_buttons_map_like_commands() {
    assert_eq!(button("latest"), command("/latest"));
    assert_eq!(button("trending"), command("/trending"));
    assert_eq!(button("upcoming"), command("/upcoming"));
}

#[test]
fn test_search_button_prompts_instead_of_searching() {
    assert_eq!(button("search"), Some(IntentKind::SearchPrompt));
}

#[test]
fn test_unknown_input_routes_nowhere() {
    assert_eq!(command("/unknown"), None);
    assert_eq!(command("just chatting"), None);
    assert_eq!(button("delete_0"), None);
}

#[test]
fn test_intent_keeps_originating_chat() {
    let intent = route(&InboundEvent::Button {
        chat_id: ChatId(-100123),
        tag: "latest".to_string(),
    });
    assert_eq!(
        intent,
        Some(Intent {
            chat_id: ChatId(-100123),
            kind: IntentKind::Latest
        })
    );
}
