use super::{Fixture, START_MS};
use crate::domain::intent::RecommendedTool;
use crate::domain::{ChatId, IntentResult, ParseOutcome, PromptStyle, SendOptions, Sender};
use crate::ports::outbound::{CharacterStore, ChatStore};
use crate::usecase::chat::NO_RESPONSE_TEXT;
use common::error::Error;
use common::ports::outbound::{KeyValueStore, LogLevel};

const MIRA: &str = r#"{"characterId":3,"name":"Mira","role":"tutor","systemPrompt":"Patient and kind.","voiceId":"","lifeStage":{"stage":"teen","description":"Curious."}}"#;

fn confident_intent() -> IntentResult {
    IntentResult {
        matched_intention: Some("learn_spanish".to_string()),
        confidence: 0.82,
        recommended_tools: vec![RecommendedTool {
            name: "Flashcards".to_string(),
            description: "Spaced repetition cards".to_string(),
            confidence: 0.9,
        }],
        ..Default::default()
    }
}

fn current_chat_id(f: &Fixture) -> ChatId {
    f.store.current_chat_id().unwrap().unwrap()
}

#[test]
fn test_send_plain_reply_is_stored_after_user_message() {
    let f = Fixture::new();
    let outcome = f.chat().send_message("hello", &SendOptions::default()).unwrap();

    assert_eq!(outcome.chat_id, ChatId::from_millis(START_MS));
    assert_eq!(outcome.detected, None);
    assert!(outcome.parsed.is_recognized());

    let record = f.store.load_chat(&outcome.chat_id).unwrap().unwrap();
    assert_eq!(record.folder_id.as_deref(), Some("default"));
    assert_eq!(record.messages.len(), 2);
    assert_eq!(record.messages[0].sender, Sender::User);
    assert_eq!(record.messages[0].id, format!("{}-{}", START_MS, START_MS));
    assert_eq!(record.messages[1].sender, Sender::Ai);
    assert_eq!(record.messages[1].id, format!("{}-{}", START_MS, START_MS + 1));
    assert_eq!(record.messages[1].id, outcome.message_id);
    assert_eq!(record.messages[1].content, "Hi there!");
}

#[test]
fn test_confident_intent_uses_optimized_prompt_and_stores_rendering() {
    let f = Fixture::new();
    f.intent.set(Ok(confident_intent()));
    f.llm.reply(Ok(Some(
        "```json\n{\"response\": \"Here you go\", \"code\": `<div>hola</div>`}\n```".to_string(),
    )));

    let outcome = f.chat().send_message("teach me spanish", &SendOptions::default()).unwrap();

    assert_eq!(
        outcome.detected.as_deref(),
        Some("Detected: learn_spanish (82% confidence)")
    );
    assert!(f.llm.last_system().contains("- Name: Flashcards"));
    let content = outcome.parsed.content().unwrap();
    assert_eq!(content.explanation(), "Here you go");
    assert_eq!(content.snippet(), Some("<div>hola</div>"));

    let record = f.store.load_chat(&outcome.chat_id).unwrap().unwrap();
    assert_eq!(
        record.messages[1].content,
        "Here you go\n\n### Render Code Below ###\n<div>hola</div>"
    );
}

#[test]
fn test_intent_below_threshold_uses_casual_prompt() {
    let f = Fixture::new();
    let mut intent = confident_intent();
    intent.confidence = 0.29;
    f.intent.set(Ok(intent));
    f.chat().engage_character(MIRA).unwrap();

    let outcome = f.chat().send_message("hi", &SendOptions::default()).unwrap();

    assert_eq!(outcome.detected, None);
    assert!(f.llm.last_system().starts_with("You are Mira, a tutor."));
}

#[test]
fn test_intent_failure_falls_back_and_warns() {
    let f = Fixture::new();
    f.intent.set(Err(Error::http("connection refused")));

    f.chat().send_message("hi", &SendOptions::default()).unwrap();

    assert!(f.llm.last_system().starts_with("You are a friendly AI companion."));
    assert!(f.log.has(LogLevel::Warn, "connection refused"));
}

#[test]
fn test_explicit_system_and_style_apply_without_intent() {
    let f = Fixture::new();
    let options = SendOptions {
        system: Some("Answer in haiku.".to_string()),
        style: Some(PromptStyle::Creative),
        ..Default::default()
    };
    f.chat().send_message("spring", &options).unwrap();
    assert_eq!(f.llm.last_system(), "Answer in haiku.");

    let options = SendOptions {
        style: Some(PromptStyle::Analytical),
        ..Default::default()
    };
    f.chat().send_message("numbers", &options).unwrap();
    assert!(f.llm.last_system().starts_with("You are an analytical assistant"));
}

#[test]
fn test_confident_intent_overrides_explicit_system() {
    let f = Fixture::new();
    f.intent.set(Ok(confident_intent()));
    let options = SendOptions {
        system: Some("Answer in haiku.".to_string()),
        ..Default::default()
    };
    f.chat().send_message("teach me", &options).unwrap();
    assert!(f.llm.last_system().contains("User intent: \"learn_spanish\""));
}

#[test]
fn test_invalid_input_is_rejected_before_storing() {
    let f = Fixture::new();
    let err = f.chat().send_message("   ", &SendOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "Please enter a message");
    assert!(err.is_usage());

    let options = SendOptions {
        system: Some("x".repeat(4001)),
        ..Default::default()
    };
    assert!(f.chat().send_message("hi", &options).unwrap_err().is_usage());
    assert!(f.kv.keys().unwrap().iter().all(|k| !k.starts_with("chat_")));
    assert!(f.llm.requests.lock().unwrap().is_empty());
}

#[test]
fn test_missing_completion_text_uses_placeholder() {
    let f = Fixture::new();
    f.llm.reply(Ok(None));
    let outcome = f.chat().send_message("hi", &SendOptions::default()).unwrap();
    assert_eq!(outcome.raw, NO_RESPONSE_TEXT);

    f.llm.reply(Ok(Some(String::new())));
    let outcome = f.chat().send_message("again", &SendOptions::default()).unwrap();
    assert_eq!(outcome.raw, NO_RESPONSE_TEXT);
}

#[test]
fn test_llm_failure_leaves_error_message_in_chat() {
    let f = Fixture::new();
    f.llm.reply(Err(Error::http("Chat completions error: HTTP 401")));

    let err = f.chat().send_message("hi", &SendOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Http(_)));

    let record = f.store.load_chat(&current_chat_id(&f)).unwrap().unwrap();
    assert_eq!(record.messages.len(), 2);
    assert_eq!(record.messages[1].sender, Sender::Ai);
    assert_eq!(record.messages[1].content, "Chat completions error: HTTP 401");
    assert!(f.log.has(LogLevel::Error, "HTTP 401"));
}

#[test]
fn test_unrecognized_reply_is_stored_raw() {
    let f = Fixture::new();
    f.llm.reply(Ok(Some("{ malformed".to_string())));
    let outcome = f.chat().send_message("hi", &SendOptions::default()).unwrap();
    assert_eq!(outcome.parsed, ParseOutcome::Unrecognized);

    let (_, messages) = f.chat().current_messages().unwrap();
    assert_eq!(messages[1].content, "{ malformed");
}

#[test]
fn test_new_chat_and_histories() {
    let f = Fixture::new();
    let chat = f.chat();
    chat.send_message("first chat", &SendOptions::default()).unwrap();

    f.clock.set(START_MS + 5_000);
    let second = chat.new_chat().unwrap();
    assert_eq!(second, ChatId::from_millis(START_MS + 5_000));
    assert!(chat.current_messages().unwrap().1.is_empty());
    assert_eq!(chat.chat_histories().unwrap().len(), 1);

    chat.send_message("second chat", &SendOptions::default()).unwrap();
    let histories = chat.chat_histories().unwrap();
    assert_eq!(histories.len(), 2);
    assert_eq!(histories[1].id, second);
    assert_eq!(histories[1].title(), "second chat");

    let first = chat.load_chat(&ChatId::from_millis(START_MS)).unwrap();
    assert_eq!(first[0].content, "first chat");
    assert_eq!(current_chat_id(&f), ChatId::from_millis(START_MS));
}

#[test]
fn test_active_folder_applies_to_new_chats_only() {
    let f = Fixture::new();
    let chat = f.chat();
    chat.set_active_folder("study").unwrap();
    chat.send_message("hi", &SendOptions::default()).unwrap();
    let id = current_chat_id(&f);
    assert_eq!(f.store.load_chat(&id).unwrap().unwrap().folder_id.as_deref(), Some("study"));

    chat.set_active_folder("work").unwrap();
    chat.send_message("again", &SendOptions::default()).unwrap();
    assert_eq!(f.store.load_chat(&id).unwrap().unwrap().folder_id.as_deref(), Some("study"));
}

#[test]
fn test_new_chat_folder_is_consumed_once() {
    let f = Fixture::new();
    let chat = f.chat();
    chat.set_active_folder("work").unwrap();
    chat.set_new_chat_folder("ideas").unwrap();
    chat.new_chat().unwrap();
    chat.send_message("brainstorm", &SendOptions::default()).unwrap();

    let id = current_chat_id(&f);
    assert_eq!(f.store.load_chat(&id).unwrap().unwrap().folder_id.as_deref(), Some("ideas"));
    assert_eq!(f.store.new_chat_folder().unwrap(), None);

    assert!(chat.set_new_chat_folder("  ").unwrap_err().is_usage());
}

#[test]
fn test_legacy_chat_appears_in_default_folder() {
    let f = Fixture::new();
    f.kv.set(
        "chat_42",
        r#"[{"id":"42-43","content":"Old message","sender":"user","timestamp":"2024-01-01T00:00:00.000Z","starred":false}]"#,
    )
    .unwrap();
    let histories = f.chat().chat_histories().unwrap();
    assert_eq!(histories.len(), 1);
    assert_eq!(histories[0].id, ChatId::from_millis(42));
    assert_eq!(histories[0].folder_id, "default");
}

#[test]
fn test_unreadable_chat_is_skipped_with_warning() {
    let f = Fixture::new();
    f.kv.set("chat_1", "{broken").unwrap();
    f.kv.set("chat_2", r#"{"messages":[],"folderId":"x"}"#).unwrap();
    assert!(f.chat().chat_histories().unwrap().is_empty());
    assert!(f.log.has(LogLevel::Warn, "chat_1"));
}

#[test]
fn test_toggle_star_twice_restores_state() {
    let f = Fixture::new();
    let chat = f.chat();
    let outcome = chat.send_message("hi", &SendOptions::default()).unwrap();

    assert!(chat.toggle_star(&outcome.message_id).unwrap());
    let starred = chat.starred_messages().unwrap();
    assert_eq!(starred.len(), 1);
    assert_eq!(starred[0].id, outcome.message_id);

    assert!(!chat.toggle_star(&outcome.message_id).unwrap());
    assert!(chat.starred_messages().unwrap().is_empty());

    assert!(chat.toggle_star("nope").unwrap_err().is_usage());
}

#[test]
fn test_search_is_case_insensitive_across_chats() {
    let f = Fixture::new();
    let chat = f.chat();
    f.llm.reply(Ok(Some("Rust is fun".to_string())));
    chat.send_message("Tell me about RUST", &SendOptions::default()).unwrap();
    f.clock.set(START_MS + 10);
    chat.new_chat().unwrap();
    f.llm.reply(Ok(Some("Paris".to_string())));
    chat.send_message("capital of France?", &SendOptions::default()).unwrap();

    let hits = chat.search("rust").unwrap();
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|h| h.chat_id == ChatId::from_millis(START_MS)));

    assert_eq!(chat.search("paris").unwrap().len(), 1);
    assert!(chat.search("  ").unwrap().is_empty());
}

#[test]
fn test_export_snippet_reparses_stored_content() {
    let f = Fixture::new();
    let chat = f.chat();
    f.llm.reply(Ok(Some(
        "{\"response\": \"A card\", \"code\": \"<div class=\\\"card\\\">1</div>\"}".to_string(),
    )));
    let with_code = chat.send_message("card", &SendOptions::default()).unwrap();
    f.clock.set(START_MS + 10);
    f.llm.reply(Ok(Some("just text".to_string())));
    let plain = chat.send_message("text", &SendOptions::default()).unwrap();

    assert_eq!(
        chat.export_snippet(&with_code.message_id).unwrap().as_deref(),
        Some("<div class=\"card\">1</div>")
    );
    assert_eq!(chat.export_snippet(&plain.message_id).unwrap(), None);
    assert!(chat.export_snippet("missing").unwrap_err().is_usage());
}

#[test]
fn test_corrupt_character_falls_back_to_generic_prompt() {
    let f = Fixture::new();
    f.kv.set("engagedCharacter", "not json").unwrap();
    assert!(f.store.engaged().is_err());

    f.chat().send_message("hi", &SendOptions::default()).unwrap();
    assert!(f.llm.last_system().starts_with("You are a friendly AI companion."));
    assert!(f.log.has(LogLevel::Warn, "Ignoring stored character"));
}

#[test]
fn test_disengage_returns_to_generic_prompt() {
    let f = Fixture::new();
    let chat = f.chat();
    chat.engage_character(MIRA).unwrap();
    chat.disengage_character().unwrap();

    assert_eq!(chat.engaged_character(), None);
    chat.send_message("hi", &SendOptions::default()).unwrap();
    assert!(f.llm.last_system().starts_with("You are a friendly AI companion."));
    assert!(f.log.has(LogLevel::Info, "character disengaged"));
}

#[test]
fn test_empty_stored_character_list_is_not_a_warning() {
    let f = Fixture::new();
    f.kv.set("engagedCharacter", "[]").unwrap();

    f.chat().send_message("hi", &SendOptions::default()).unwrap();
    assert!(f.llm.last_system().starts_with("You are a friendly AI companion."));
    assert!(!f.log.has(LogLevel::Warn, "Ignoring stored character"));
}

#[test]
fn test_list_profiles_passes_through() {
    let f = Fixture::new();
    let (names, default) = f.chat().list_profiles().unwrap();
    assert_eq!(names, vec!["echo", "sonar"]);
    assert_eq!(default, "sonar");
}
