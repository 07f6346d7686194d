//! Shortcut integration tests: expansion through the session loop,
//! recursion limits, and persistence across restarts.

use std::time::Duration;

use mssh::element::Child;
use mssh::persistence::ShortcutStore;
use mssh::session::{Session, SessionState, MAX_SHORTCUT_NESTING};
use mssh::transport::MockTransport;
use tempfile::tempdir;

fn new_session(transport: &MockTransport, store: ShortcutStore) -> Session {
    let shortcuts = store.load().unwrap();
    Session::new(
        SessionState::new("tester", Duration::from_secs(1), shortcuts),
        Box::new(transport.clone()),
        store,
    )
}

async fn run_script(session: &mut Session, script: &str) -> String {
    let mut out = Vec::new();
    session.run(script.as_bytes(), &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

#[tokio::test]
async fn test_define_show_and_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shortcuts.txt");
    let transport = MockTransport::new();

    let mut first = new_session(&transport, ShortcutStore::new(&path));
    let out = run_script(&mut first, "!shortcut foo bar baz\n!shortcut foo\n").await;
    assert!(out.contains("Defined: foo -> bar baz"));

    let mut second = new_session(&transport, ShortcutStore::new(&path));
    assert_eq!(second.state().shortcuts.get("foo"), Some("bar baz"));
    let out = run_script(&mut second, "!s foo\n!s\n").await;
    assert!(out.contains("Defined: foo -> bar baz"));
    assert!(out.contains("foo -> bar baz\n"));
}

#[tokio::test]
async fn test_colon_in_name_is_rejected_and_not_saved() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shortcuts.txt");
    let transport = MockTransport::new();

    let mut first = new_session(&transport, ShortcutStore::new(&path));
    let out = run_script(&mut first, "!shortcut a:b ping\n!shortcut ok pong\n").await;
    assert!(out.contains("Error: Invalid shortcut name 'a:b'"));

    let second = new_session(&transport, ShortcutStore::new(&path));
    let names: Vec<&str> = second.state().shortcuts.iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["ok"]);
}

#[tokio::test]
async fn test_expansion_runs_as_packet() {
    let dir = tempdir().unwrap();
    let transport = MockTransport::new();
    let mut session = new_session(&transport, ShortcutStore::new(dir.path().join("s.txt")));

    let out = run_script(
        &mut session,
        "!c peer:1\n!shortcut ping ping $1 $2\n@ping host 22\n",
    )
    .await;

    assert!(out.contains("-> ping host 22\n"));
    let sent = transport.calls().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].attribute("Type"), Some("ping"));
    assert_eq!(
        sent[0].children,
        vec![Child::Text("host".to_string()), Child::Text("22".to_string())]
    );
}

#[tokio::test]
async fn test_preview_only_prints() {
    let dir = tempdir().unwrap();
    let transport = MockTransport::new();
    let mut session = new_session(&transport, ShortcutStore::new(dir.path().join("s.txt")));

    let out = run_script(
        &mut session,
        "!c peer:1\n!shortcut ping ping $1 cost$ \\$2\n@?ping host\n",
    )
    .await;

    assert!(out.contains("?-> ping host cost$ \\$2\n"));
    assert!(transport.calls().sent().is_empty());
}

#[tokio::test]
async fn test_nested_shortcuts_chain() {
    let dir = tempdir().unwrap();
    let transport = MockTransport::new();
    let mut session = new_session(&transport, ShortcutStore::new(dir.path().join("s.txt")));

    let out = run_script(
        &mut session,
        "!s outer @inner $1\n!s inner !name $1\n@outer chained\n",
    )
    .await;

    assert!(out.contains("-> @inner chained\n"));
    assert!(out.contains("-> !name chained\n"));
    assert_eq!(session.state().name, "chained");
}

#[tokio::test]
async fn test_recursive_shortcut_is_stopped() {
    let dir = tempdir().unwrap();
    let transport = MockTransport::new();
    let mut session = new_session(&transport, ShortcutStore::new(dir.path().join("s.txt")));

    let out = run_script(
        &mut session,
        "!shortcut loop @loop\n@loop\n!name after\n",
    )
    .await;

    assert_eq!(out.matches("-> @loop\n").count(), MAX_SHORTCUT_NESTING);
    assert_eq!(out.matches("Error: Shortcut nesting is too deep").count(), 1);
    assert!(session.state().pending.is_empty());
    assert_eq!(session.state().name, "after");
}

#[tokio::test]
async fn test_recursion_limit_resets_per_interactive_line() {
    let dir = tempdir().unwrap();
    let transport = MockTransport::new();
    let mut session = new_session(&transport, ShortcutStore::new(dir.path().join("s.txt")));

    let out = run_script(&mut session, "!shortcut loop @loop\n@loop\n@loop\n").await;

    assert_eq!(out.matches("-> @loop\n").count(), 2 * MAX_SHORTCUT_NESTING);
    assert_eq!(out.matches("Error: Shortcut nesting is too deep").count(), 2);
}

#[tokio::test]
async fn test_shortcut_errors_are_reported() {
    let dir = tempdir().unwrap();
    let transport = MockTransport::new();
    let mut session = new_session(&transport, ShortcutStore::new(dir.path().join("s.txt")));

    let out = run_script(
        &mut session,
        "@missing\n!s two $1 $2\n@two only\n@\n@two \"open\n",
    )
    .await;

    assert!(out.contains("Error: Shortcut missing is not defined"));
    assert!(out.contains("Error: Invalid shortcut argument $2"));
    assert!(out.contains("Error: Missing shortcut name after @"));
    assert!(out.contains("Error: Missing \" at end of string literal"));
}

#[tokio::test]
async fn test_corrupt_store_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("s.txt");
    std::fs::write(&path, "no separator here\n").unwrap();

    assert!(ShortcutStore::new(&path).load().is_err());
}
