//! Session loop integration tests.
//!
//! Drives full sessions from scripted input against the mock transport.

use std::time::Duration;

use mssh::element::{Child, Element, REPLY};
use mssh::persistence::ShortcutStore;
use mssh::session::{Session, SessionState};
use mssh::shortcuts::ShortcutTable;
use mssh::transport::MockTransport;
use pretty_assertions::assert_eq;
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
async fn test_prompt_and_connect_flow() {
    let dir = tempdir().unwrap();
    let transport = MockTransport::new();
    let mut session = new_session(&transport, ShortcutStore::new(dir.path().join("s.txt")));

    let out = run_script(&mut session, "!connect peer:9000\n\n!quit\n").await;

    assert!(out.starts_with("[--Not open-- -> -?-]: Connected to: peer:9000\n"));
    assert!(out.contains("[tester -> -?-]: "));
    assert_eq!(transport.calls().addresses(), vec!["peer:9000".to_string()]);
    assert_eq!(transport.calls().closes(), 1);
}

#[tokio::test]
async fn test_end_of_input_closes_connection() {
    let dir = tempdir().unwrap();
    let transport = MockTransport::new();
    let mut session = new_session(&transport, ShortcutStore::new(dir.path().join("s.txt")));

    run_script(&mut session, "!connect peer:9000\n").await;

    assert!(!session.state().is_connected());
    assert_eq!(transport.calls().closes(), 1);
}

#[tokio::test]
async fn test_packet_tree_reaches_transport() {
    let dir = tempdir().unwrap();
    let transport = MockTransport::new();
    let mut session = new_session(&transport, ShortcutStore::new(dir.path().join("s.txt")));

    run_script(
        &mut session,
        "!c peer:1\nset id=7 <Item color=red \"big box\" > done\n",
    )
    .await;

    let mut item = Element::new("Item").with_attribute("color", "red");
    item.push_text("big box");
    let mut expected = Element::new("Message")
        .with_attribute("Type", "set")
        .with_attribute("id", "7");
    expected.push_element(item);
    expected.push_text("done");

    assert_eq!(transport.calls().sent(), vec![expected]);
}

#[tokio::test]
async fn test_disconnected_packets_never_reach_transport() {
    let dir = tempdir().unwrap();
    let transport = MockTransport::new();
    let mut session = new_session(&transport, ShortcutStore::new(dir.path().join("s.txt")));

    let out = run_script(&mut session, "ping a=1\n? ping a=1\n").await;

    assert_eq!(out.matches("Error: Not connected").count(), 2);
    assert_eq!(transport.calls().total(), 0);
}

#[tokio::test]
async fn test_request_reply_and_timeout() {
    let dir = tempdir().unwrap();
    let transport = MockTransport::new();
    transport.push_reply(Element::new(REPLY).with_attribute("status", "up"));
    let mut session = new_session(&transport, ShortcutStore::new(dir.path().join("s.txt")));

    let out = run_script(
        &mut session,
        "!c peer:1\n? status\n!timeout 0\n? status\n",
    )
    .await;

    assert!(out.contains(r#"Submitting: <Request Type="status" />"#));
    assert!(out.contains(r#"Got reply: <Reply status="up" />"#));
    assert!(out.contains("Error: Request timed out after 0ns"));
    assert_eq!(transport.calls().submitted().len(), 2);
}

#[tokio::test]
async fn test_login_sets_peer_in_prompt() {
    let dir = tempdir().unwrap();
    let transport = MockTransport::new();
    transport.push_reply(Element::new(REPLY).with_attribute("Name", "core"));
    let mut session = new_session(&transport, ShortcutStore::new(dir.path().join("s.txt")));

    let out = run_script(&mut session, "!c peer:1\n!login\n").await;

    assert!(out.contains("Login reply: "));
    assert!(out.contains("[tester -> core]: "));
}

#[tokio::test]
async fn test_disconnect_twice_reports_not_connected() {
    let dir = tempdir().unwrap();
    let transport = MockTransport::new();
    let mut session = new_session(&transport, ShortcutStore::new(dir.path().join("s.txt")));

    let out = run_script(&mut session, "!c peer:1\n!d\n!d\n").await;

    assert!(out.contains("Disconnecting from: tester"));
    assert_eq!(out.matches("Error: Not connected").count(), 1);
    assert_eq!(transport.calls().closes(), 1);
}

#[tokio::test]
async fn test_unsupported_command_lists_valid_commands() {
    let dir = tempdir().unwrap();
    let transport = MockTransport::new();
    let mut session = new_session(&transport, ShortcutStore::new(dir.path().join("s.txt")));

    let out = run_script(&mut session, "!zap\n").await;

    assert!(out.contains("Error: Unsupported command 'zap'"));
    assert!(out.contains("!connect"));
    assert!(out.contains("!shortcut"));
}

#[tokio::test]
async fn test_errors_do_not_stop_the_loop() {
    let dir = tempdir().unwrap();
    let transport = MockTransport::new();
    let mut session = new_session(&transport, ShortcutStore::new(dir.path().join("s.txt")));

    let out = run_script(
        &mut session,
        "!c peer:1\ncmd <child\ncmd \"open\n!timeout x\n!name survivor\n",
    )
    .await;

    assert!(out.contains("Error: Missing '>' at end of child element definition"));
    assert!(out.contains("Error: Missing \" at end of string literal"));
    assert!(out.contains("Error: Invalid timeout 'x'"));
    assert_eq!(session.state().name, "survivor");
    assert_eq!(session.state().shortcuts, ShortcutTable::new());
}

#[tokio::test]
async fn test_text_children_keep_token_order() {
    let dir = tempdir().unwrap();
    let transport = MockTransport::new();
    let mut session = new_session(&transport, ShortcutStore::new(dir.path().join("s.txt")));

    run_script(&mut session, "!c peer:1\nlog c a=1 b \"x y\" a\n").await;

    let sent = transport.calls().sent();
    assert_eq!(sent[0].attributes.len(), 2);
    assert_eq!(
        sent[0].children,
        vec![
            Child::Text("c".to_string()),
            Child::Text("b".to_string()),
            Child::Text("x y".to_string()),
            Child::Text("a".to_string()),
        ]
    );
}
