//! Tests for session settings, history, and mode handling.

use serde_json::{json, Value};

use super::*;
use crate::credential::CredentialSources;
use crate::Message;
use oaik_config::OaikConfig;

fn session() -> SessionState {
    SessionState::new(&OaikConfig::default(), &CredentialSources::default())
}

#[test]
fn defaults_are_seeded() {
    let state = session();
    assert_eq!(state.get("system_prompt"), json!("You are a helpful assistant."));
    assert_eq!(state.get("model"), json!("gpt-3.5-turbo"));
    assert_eq!(state.get("temperature"), json!(1));
    assert_eq!(state.get("chat_kwargs"), json!({}));
    assert_eq!(state.get("size"), json!("512x512"));
    assert_eq!(state.get("n"), json!(1));
    assert_eq!(state.get("mode"), json!("chat"));
    assert_eq!(state.get("use_history"), json!(true));
    assert_eq!(state.get("api_key"), Value::Null);
}

#[test]
fn unknown_names_read_as_null_and_round_trip() {
    let mut state = session();
    assert_eq!(state.get("x"), Value::Null);

    for value in [json!(42), json!([1, 2, 3]), json!({"a": {"b": null}}), json!("s")] {
        state.set("x", value.clone()).unwrap();
        assert_eq!(state.get("x"), value);
    }

    state.set("X", json!(1)).unwrap();
    assert_eq!(state.get("x"), json!("s"));
    assert_eq!(state.get("X"), json!(1));
}

#[test]
fn setting_key_clears_path_and_vice_versa() {
    let mut state = session();

    state.set("api_key_path", json!("/path/to/sekrit")).unwrap();
    assert_eq!(state.get("api_key_path"), json!("/path/to/sekrit"));
    assert_eq!(state.get("api_key"), Value::Null);

    state.set("api_key", json!("bother")).unwrap();
    assert_eq!(state.get("api_key"), json!("bother"));
    assert_eq!(state.get("api_key_path"), Value::Null);

    state.set_api_key_path(Some("/again".into()));
    assert_eq!(state.get("api_key"), Value::Null);
}

#[test]
fn organization_is_first_class() {
    let mut state = session();
    state.set("organization", json!("org-42")).unwrap();
    assert_eq!(state.client().organization.as_deref(), Some("org-42"));
    assert_eq!(state.get("organization"), json!("org-42"));
    assert_eq!(state.variable("organization"), None);
}

#[test]
fn invalid_mode_is_ignored() {
    let mut state = session();
    state.set_mode("image");
    assert_eq!(state.mode(), Mode::Image);

    state.set_mode("video");
    assert_eq!(state.mode(), Mode::Image);

    state.set("mode", json!(3)).unwrap();
    assert_eq!(state.mode(), Mode::Image);

    state.set("mode", json!("chat")).unwrap();
    assert_eq!(state.mode(), Mode::Chat);
}

#[test]
fn invalid_mode_in_config_falls_back_to_chat() {
    let mut config = OaikConfig::default();
    config.session.mode = "sculpture".into();
    let state = SessionState::new(&config, &CredentialSources::default());
    assert_eq!(state.mode(), Mode::Chat);
}

#[test]
fn effective_history_prepends_system_prompt() {
    let mut state = session();
    state.append_exchange(Message::user("hi"), Message::assistant("hello"));

    let history = state.effective_history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0], Message::system("You are a helpful assistant."));
    assert_eq!(history[1], Message::user("hi"));
    assert_eq!(history[2], Message::assistant("hello"));
}

#[test]
fn empty_or_null_system_prompt_is_omitted() {
    let mut state = session();
    state.set("system_prompt", Value::Null).unwrap();
    assert!(state.effective_history().is_empty());

    state.set("system_prompt", json!("")).unwrap();
    assert!(state.effective_history().is_empty());

    let mut config = OaikConfig::default();
    config.session.system_prompt.clear();
    let state = SessionState::new(&config, &CredentialSources::default());
    assert_eq!(state.get("system_prompt"), Value::Null);
    assert!(state.effective_history().is_empty());
}

#[test]
fn disabling_history_keeps_system_message() {
    let mut state = session();
    state.append_exchange(Message::user("a"), Message::assistant("b"));
    state.set("use_history", json!(false)).unwrap();

    let before = state.effective_history();
    state.append_exchange(Message::user("c"), Message::assistant("d"));
    assert_eq!(state.effective_history(), before);
    assert_eq!(before, vec![Message::system("You are a helpful assistant.")]);

    // Stored history is kept while suppressed.
    assert_eq!(state.history().len(), 4);
    state.set("use_history", json!(1)).unwrap();
    assert_eq!(state.effective_history().len(), 5);
}

#[test]
fn history_setting_replaces_wholesale() {
    let mut state = session();
    state.append_exchange(Message::user("old"), Message::assistant("old reply"));

    state
        .set(
            "history",
            json!([
                {"role": "user", "content": "hello bot"},
                {"role": "assistant", "content": "hi user"}
            ]),
        )
        .unwrap();

    assert_eq!(
        state.history(),
        &[Message::user("hello bot"), Message::assistant("hi user")]
    );
    assert_eq!(
        state.get("history"),
        json!([
            {"role": "system", "content": "You are a helpful assistant."},
            {"role": "user", "content": "hello bot"},
            {"role": "assistant", "content": "hi user"}
        ])
    );
}

#[test]
fn malformed_history_is_rejected_without_change() {
    let mut state = session();
    state.append_exchange(Message::user("keep"), Message::assistant("me"));

    let err = state.set("history", json!("not a list")).unwrap_err();
    assert!(err.to_string().contains("history must be a list"));
    assert_eq!(state.history().len(), 2);
}

#[test]
fn clear_only_touches_history() {
    let mut state = session();
    state.set("model", json!("gpt-4")).unwrap();
    state.set_mode("image");
    state.append_exchange(Message::user("a"), Message::assistant("b"));

    state.clear();

    assert!(state.history().is_empty());
    assert_eq!(state.get("model"), json!("gpt-4"));
    assert_eq!(state.mode(), Mode::Image);
}

#[test]
fn fractional_temperature_is_kept() {
    let mut config = OaikConfig::default();
    config.session.temperature = 0.7;
    let state = SessionState::new(&config, &CredentialSources::default());
    assert_eq!(state.get("temperature"), json!(0.7));
}
