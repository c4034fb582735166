use std::fs;

use quote_core::questionnaire::{question, Action, Answer, QuestionnaireState};
use quote_core::session::{SessionStore, SESSION_PREFIX};
use regex::Regex;
use tempfile::tempdir;

fn sample_state() -> QuestionnaireState {
    let mut state = QuestionnaireState::default();
    state.apply(Action::SetAnswer {
        id: question::INDUSTRY.into(),
        value: Answer::text("Healthcare"),
    });
    state.apply(Action::SetAnswer {
        id: question::FEATURES.into(),
        value: Answer::multi(["E-commerce", "Live chat"]),
    });
    state.apply(Action::NextStep);
    state.apply(Action::SetQuickMode(true));
    state
}

#[test]
fn save_then_load_reconstructs_every_field() {
    let temp = tempdir().unwrap();
    let store = SessionStore::new(Some(temp.path().to_path_buf())).unwrap();

    let state = sample_state();
    let id = store.save(&state).expect("save should succeed");
    let loaded = store.load(&id).expect("load should succeed");

    assert_eq!(loaded, state);
    assert_eq!(loaded.history, state.history);
    assert!(loaded.can_undo());
}

#[test]
fn generated_ids_follow_the_documented_format() {
    let temp = tempdir().unwrap();
    let store = SessionStore::new(Some(temp.path().to_path_buf())).unwrap();
    let id = store.save(&QuestionnaireState::default()).unwrap();

    let pattern = Regex::new(r"^quote-session-\d+-[0-9a-f]{8}$").unwrap();
    assert!(pattern.is_match(&id), "unexpected id format: {id}");
}

#[test]
fn missing_sessions_read_as_absent() {
    let temp = tempdir().unwrap();
    let store = SessionStore::new(Some(temp.path().to_path_buf())).unwrap();
    assert!(store.load("quote-session-1-00000000").is_none());
}

#[test]
fn malformed_ids_never_reach_the_filesystem() {
    let temp = tempdir().unwrap();
    let store = SessionStore::new(Some(temp.path().to_path_buf())).unwrap();
    assert!(store.load("../../etc/passwd").is_none());
    assert!(store.save_as("not-a-session", &QuestionnaireState::default()).is_none());
}

#[test]
fn corrupt_json_reads_as_absent() {
    let temp = tempdir().unwrap();
    let store = SessionStore::new(Some(temp.path().to_path_buf())).unwrap();
    let id = "quote-session-1-deadbeef";
    fs::write(store.session_path(id), "{ not json").unwrap();
    assert!(store.load(id).is_none());
}

#[test]
fn clear_is_idempotent() {
    let temp = tempdir().unwrap();
    let store = SessionStore::new(Some(temp.path().to_path_buf())).unwrap();
    let id = store.save(&sample_state()).unwrap();

    store.clear(&id);
    assert!(store.load(&id).is_none());
    // Clearing an absent key is not an error.
    store.clear(&id);
    store.clear("quote-session-1-00000000");
}

#[test]
fn overwriting_the_same_id_is_last_write_wins() {
    let temp = tempdir().unwrap();
    let store = SessionStore::new(Some(temp.path().to_path_buf())).unwrap();

    let first = sample_state();
    let id = store.save(&first).unwrap();

    let mut second = first.clone();
    second.apply(Action::SetAnswer {
        id: question::TIMELINE.into(),
        value: Answer::text("Rush (2-4 weeks)"),
    });
    assert_eq!(store.save_as(&id, &second).as_deref(), Some(id.as_str()));

    let loaded = store.load(&id).unwrap();
    assert_eq!(loaded, second);
}

#[test]
fn failed_save_preserves_the_existing_snapshot() {
    let temp = tempdir().unwrap();
    let store = SessionStore::new(Some(temp.path().to_path_buf())).unwrap();

    let state = sample_state();
    let id = store.save(&state).unwrap();
    let original = fs::read_to_string(store.session_path(&id)).unwrap();

    // A directory colliding with the staging path forces the write to fail.
    let mut tmp = store.session_path(&id);
    tmp.set_extension("json.tmp");
    fs::create_dir_all(&tmp).unwrap();

    let mut changed = state.clone();
    changed.apply(Action::SetAnswer {
        id: question::CONTACT.into(),
        value: Answer::text("someone@example.com"),
    });
    assert!(store.save_as(&id, &changed).is_none(), "save must degrade");

    let current = fs::read_to_string(store.session_path(&id)).unwrap();
    assert_eq!(current, original, "failed save must not corrupt the file");
}

#[test]
fn persisted_json_carries_the_documented_contract() {
    let temp = tempdir().unwrap();
    let store = SessionStore::new(Some(temp.path().to_path_buf())).unwrap();

    let mut state = sample_state();
    state.apply(Action::SetAnswer {
        id: question::TIMELINE.into(),
        value: Answer::text("Rush (2-4 weeks)"),
    });
    let id = store.save(&state).unwrap();

    let raw = fs::read_to_string(store.session_path(&id)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(json.get("currentStep").is_some());
    assert!(json.get("quickMode").is_some());
    assert!(json.get("history").is_some());
    assert!(json.get("historyIndex").is_some());
    assert!(json.get("isComplete").is_some());
    // Legacy mirror fields ride along for older readers.
    assert_eq!(json["industry"], "Healthcare");
    assert_eq!(json["timeline"], "Rush (2-4 weeks)");
    assert_eq!(json["isCompleted"], false);
}

#[test]
fn legacy_only_snapshots_still_restore() {
    let temp = tempdir().unwrap();
    let store = SessionStore::new(Some(temp.path().to_path_buf())).unwrap();
    let id = "quote-session-9-0ld5nap5";
    fs::write(
        store.session_path(id),
        r#"{
            "currentStep": 4,
            "industry": "Finance",
            "goals": ["Generate leads"],
            "pages": "6-10",
            "isCompleted": true
        }"#,
    )
    .unwrap();

    let state = store.load(id).expect("legacy snapshot should load");
    assert_eq!(state.current_step, 4);
    assert_eq!(
        state.answers.get(question::INDUSTRY),
        Some(&Answer::text("Finance"))
    );
    assert_eq!(
        state.answers.get(question::GOALS),
        Some(&Answer::multi(["Generate leads"]))
    );
    assert!(state.is_complete);
}

#[test]
fn list_returns_newest_first_and_skips_corrupt_entries() {
    let temp = tempdir().unwrap();
    let store = SessionStore::new(Some(temp.path().to_path_buf())).unwrap();

    let older = store.save_as("quote-session-1-aaaaaaaa", &QuestionnaireState::default());
    assert!(older.is_some());
    let newer = store.save_as("quote-session-2-bbbbbbbb", &sample_state());
    assert!(newer.is_some());
    fs::write(store.session_path("quote-session-3-cccccccc"), "oops").unwrap();

    let summaries = store.list();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id, "quote-session-2-bbbbbbbb");
    assert_eq!(summaries[1].id, "quote-session-1-aaaaaaaa");
    assert!(summaries.iter().all(|summary| summary.id.starts_with(SESSION_PREFIX)));
    assert_eq!(summaries[0].current_step, 1);
    assert!(!summaries[0].is_complete);
}
