mod common;

use std::fs;

use anyhow::Result;
use relay_cli::session::{ActorKind, ImpersonationLevel, SessionStore, STACK_KEY};

#[test]
fn damaged_stack_file_reads_as_empty() -> Result<()> {
    let dir = common::SessionDir::new();

    for garbage in ["", "{ not json", "][", "null"] {
        fs::write(dir.stack_file(), garbage)?;

        let stack = dir.stack();
        assert!(stack.stack().is_empty(), "garbage {:?} leaked through", garbage);
        assert!(stack.peek().is_none());
        assert!(!stack.is_impersonating());
    }

    Ok(())
}

#[test]
fn wrong_shape_reads_as_empty() -> Result<()> {
    let dir = common::SessionDir::new();
    let stack = dir.stack();

    // Valid JSON, but an object where an array belongs.
    fs::write(dir.stack_file(), r#"{"type":"admin","token":"t1"}"#)?;
    assert!(stack.stack().is_empty());

    // An array in which one entry names a kind this build does not know.
    fs::write(
        dir.stack_file(),
        r#"[{"type":"admin","token":"t1"},{"type":"superuser","token":"t2"}]"#,
    )?;
    assert!(stack.stack().is_empty());

    Ok(())
}

#[test]
fn push_after_damage_starts_a_fresh_chain() -> Result<()> {
    let dir = common::SessionDir::new();
    fs::write(dir.stack_file(), "corrupted beyond repair")?;

    let stack = dir.stack();
    stack.push(ImpersonationLevel::new(ActorKind::Admin, "t-new"))?;

    let levels = stack.stack();
    assert_eq!(levels.len(), 1);
    assert_eq!(levels[0].token, "t-new");

    // The file is valid again for the next invocation.
    let raw = fs::read_to_string(dir.stack_file())?;
    assert!(serde_json::from_str::<serde_json::Value>(&raw).is_ok());

    Ok(())
}

#[test]
fn damage_to_the_stack_leaves_other_session_keys_alone() -> Result<()> {
    let dir = common::SessionDir::new();
    fs::write(dir.path().join("session.json"), r#"{"token":"op"}"#)?;
    fs::write(dir.stack_file(), "oops")?;

    let stack = dir.stack();
    assert!(stack.stack().is_empty());
    stack.push(ImpersonationLevel::new(ActorKind::Partner, "t-p"))?;

    let session_raw = fs::read_to_string(dir.path().join("session.json"))?;
    assert_eq!(session_raw, r#"{"token":"op"}"#);

    Ok(())
}

// Two CLI invocations sharing a session directory interleave their
// read-modify-write cycles: whoever writes last wins, and a level recorded
// in between is dropped without any error. This pins down the known
// limitation rather than guarding against it.
#[test]
fn stale_snapshot_overwrite_drops_concurrent_push() -> Result<()> {
    let dir = common::SessionDir::new();
    let first = dir.stack();
    let second = dir.stack();

    first.push(ImpersonationLevel::new(ActorKind::Admin, "t-admin"))?;

    // First invocation snapshots the chain, second pushes meanwhile.
    let stale = first.store().get(STACK_KEY).expect("chain just written");
    second.push(ImpersonationLevel::new(ActorKind::Partner, "t-p"))?;
    assert_eq!(second.depth(), 2);

    // First invocation writes its stale snapshot back.
    first.store().set(STACK_KEY, &stale)?;

    let levels = second.stack();
    assert_eq!(levels.len(), 1);
    assert_eq!(levels[0].token, "t-admin");

    Ok(())
}
