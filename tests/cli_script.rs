use assert_cmd::Command;
use predicates::str::contains;
use quote_core::questionnaire::{question, Action, Answer, QuestionnaireState};
use quote_core::session::SessionStore;
use tempfile::tempdir;

fn script_command(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("quote_core_cli").unwrap();
    cmd.env("QUOTE_CORE_CLI_SCRIPT", "1")
        .env("QUOTE_CORE_HOME", home);
    cmd
}

#[test]
fn script_mode_reports_an_empty_store() {
    let home = tempdir().unwrap();
    script_command(home.path())
        .write_stdin("sessions\nexit\n")
        .assert()
        .success()
        .stdout(contains("No saved sessions"));
}

#[test]
fn script_mode_shows_a_saved_session() {
    let home = tempdir().unwrap();
    let store = SessionStore::new(Some(home.path().to_path_buf())).unwrap();
    let mut state = QuestionnaireState::default();
    state.apply(Action::SetAnswer {
        id: question::INDUSTRY.into(),
        value: Answer::text("Healthcare"),
    });
    state.apply(Action::SetAnswer {
        id: question::FEATURES.into(),
        value: Answer::multi(["E-commerce"]),
    });
    let id = store.save(&state).unwrap();

    script_command(home.path())
        .write_stdin(format!("show {id}\nexit\n"))
        .assert()
        .success()
        .stdout(contains("Healthcare"))
        .stdout(contains("E-commerce"))
        // 2500 * 1.8 * 1.4 = 6300
        .stdout(contains("Estimated cost: $6300"));
}

#[test]
fn script_mode_deletes_without_prompting() {
    let home = tempdir().unwrap();
    let store = SessionStore::new(Some(home.path().to_path_buf())).unwrap();
    let id = store.save(&QuestionnaireState::default()).unwrap();

    script_command(home.path())
        .write_stdin(format!("delete {id}\nsessions\nexit\n"))
        .assert()
        .success()
        .stdout(contains("removed"))
        .stdout(contains("No saved sessions"));

    assert!(store.load(&id).is_none());
}

#[test]
fn script_mode_updates_configuration() {
    let home = tempdir().unwrap();
    script_command(home.path())
        .write_stdin("config autosave_secs 12\nconfig\nexit\n")
        .assert()
        .success()
        .stdout(contains("Configuration updated"))
        .stdout(contains("autosave_secs: 12"));
}

#[test]
fn unknown_commands_suggest_a_fix() {
    let home = tempdir().unwrap();
    script_command(home.path())
        .write_stdin("sessionz\nexit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command"))
        .stdout(contains("Did you mean `sessions`?"));
}

#[test]
fn wizard_commands_refuse_script_mode() {
    let home = tempdir().unwrap();
    script_command(home.path())
        .write_stdin("start\nexit\n")
        .assert()
        .success()
        .stdout(contains("requires an interactive terminal"));
}

#[test]
fn help_lists_every_command() {
    let home = tempdir().unwrap();
    let mut assert = script_command(home.path())
        .write_stdin("help\nexit\n")
        .assert()
        .success();
    for name in ["start", "resume", "sessions", "show", "delete", "config"] {
        assert = assert.stdout(contains(name));
    }
}
