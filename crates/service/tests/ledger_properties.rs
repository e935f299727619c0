use std::fs;
use std::path::PathBuf;

use models::{Balances, Denomination};
use service::{Ledger, ServiceError};
use uuid::Uuid;

fn tmp_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!("ledger_{}_{}.json", tag, Uuid::new_v4()))
}

struct Cleanup(PathBuf);

impl Drop for Cleanup {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}

#[test]
fn adjust_then_inverse_restores_balance() -> anyhow::Result<()> {
    let tmp = tmp_path("inverse");
    let _cleanup = Cleanup(tmp.clone());
    let mut ledger = Ledger::new(&tmp);
    ledger.add_character("Bob")?;
    ledger.adjust_balance("Bob", "gold", 11)?;

    for d in Denomination::ALL {
        for k in [0, 1, 42, -17, 1_000_000] {
            let before = ledger.balances("Bob")?;
            ledger.adjust_balance("Bob", d.key(), k)?;
            ledger.adjust_balance("Bob", d.key(), -k)?;
            assert_eq!(ledger.balances("Bob")?, before, "{d} by {k}");
        }
    }
    Ok(())
}

#[test]
fn duplicate_add_is_rejected_and_size_unchanged() -> anyhow::Result<()> {
    let tmp = tmp_path("dup");
    let _cleanup = Cleanup(tmp.clone());
    let mut ledger = Ledger::new(&tmp);
    ledger.add_character("X")?;
    ledger.adjust_balance("X", "silver", 4)?;

    let err = ledger.add_character("X").unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateName(ref n) if n == "X"));
    assert_eq!(ledger.len(), 1);
    // the existing record is untouched
    assert_eq!(ledger.balances("X")?.silver, 4);
    Ok(())
}

#[test]
fn save_then_load_round_trips() -> anyhow::Result<()> {
    let tmp = tmp_path("roundtrip");
    let copy = tmp_path("roundtrip_copy");
    let _cleanup = (Cleanup(tmp.clone()), Cleanup(copy.clone()));

    let mut ledger = Ledger::new(&tmp);
    for (name, coin, amount) in [("Alice", "copper", 3), ("Bob", "platinum", -9), ("Ünal", "gold", 12)] {
        ledger.add_character(name)?;
        ledger.adjust_balance(name, coin, amount)?;
    }
    ledger.save_to(&copy)?;

    let mut other = Ledger::new(tmp_path("unused"));
    other.load_from(&copy)?;
    assert_eq!(other.list_character_names(), ledger.list_character_names());
    for name in ledger.list_character_names() {
        assert_eq!(other.balances(&name)?, ledger.balances(&name)?);
    }
    Ok(())
}

#[test]
fn delete_unknown_fails_and_leaves_store_unmodified() -> anyhow::Result<()> {
    let tmp = tmp_path("delete");
    let _cleanup = Cleanup(tmp.clone());
    let mut ledger = Ledger::new(&tmp);
    ledger.add_character("Bob")?;
    let on_disk = fs::read(&tmp)?;

    let err = ledger.delete_character("Ghost").unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
    assert_eq!(ledger.list_character_names(), vec!["Bob"]);
    assert_eq!(fs::read(&tmp)?, on_disk);
    Ok(())
}

#[test]
fn fresh_character_adjusted_copper() -> anyhow::Result<()> {
    let tmp = tmp_path("fresh");
    let _cleanup = Cleanup(tmp.clone());
    let mut ledger = Ledger::new(&tmp);
    ledger.add_character("Bob")?;
    ledger.adjust_balance("Bob", "copper", 5)?;
    assert_eq!(ledger.balances("Bob")?, Balances::new(5, 0, 0, 0));
    Ok(())
}

#[test]
fn loads_document_with_single_character() -> anyhow::Result<()> {
    let tmp = tmp_path("alice");
    let _cleanup = Cleanup(tmp.clone());
    fs::write(
        &tmp,
        r#"{"objects": {"Alice": {"copper": 3, "silver": 0, "gold": 0, "platinum": 2}}}"#,
    )?;

    let ledger = Ledger::open(&tmp)?;
    assert_eq!(ledger.list_character_names(), vec!["Alice"]);
    assert_eq!(ledger.balances("Alice")?, Balances::new(3, 0, 0, 2));
    Ok(())
}

#[test]
fn nonexistent_path_loads_empty() -> anyhow::Result<()> {
    let tmp = tmp_path("missing");
    let ledger = Ledger::open(&tmp)?;
    assert!(ledger.is_empty());
    assert!(ledger.list_character_names().is_empty());
    assert!(!tmp.exists());
    Ok(())
}

#[test]
fn unknown_denomination_fails_without_saving() -> anyhow::Result<()> {
    let tmp = tmp_path("electrum");
    let _cleanup = Cleanup(tmp.clone());
    let mut ledger = Ledger::new(&tmp);
    ledger.add_character("Bob")?;

    // anything written after this point would replace the sentinel
    fs::write(&tmp, b"sentinel")?;
    let err = ledger.adjust_balance("Bob", "electrum", 5).unwrap_err();
    assert!(matches!(err, ServiceError::InvalidDenomination(ref d) if d == "electrum"));
    assert_eq!(fs::read(&tmp)?, b"sentinel");
    assert_eq!(ledger.balances("Bob")?, Balances::default());
    Ok(())
}

#[test]
fn load_replaces_rather_than_merges() -> anyhow::Result<()> {
    let tmp = tmp_path("replace");
    let _cleanup = Cleanup(tmp.clone());
    let mut ledger = Ledger::new(&tmp);
    ledger.add_character("Old")?;

    fs::write(&tmp, r#"{"objects": {"New": {"gold": 1}}}"#)?;
    ledger.load()?;
    assert_eq!(ledger.list_character_names(), vec!["New"]);
    assert_eq!(ledger.balances("New")?, Balances::new(0, 0, 1, 0));
    Ok(())
}

#[test]
fn corrupt_documents_are_rejected_and_state_kept() -> anyhow::Result<()> {
    let tmp = tmp_path("corrupt");
    let _cleanup = Cleanup(tmp.clone());
    let mut ledger = Ledger::new(&tmp);
    ledger.add_character("Keep")?;

    let bad_documents = [
        r#"{"objects": {"Alice": {"copper": "three"}}}"#,
        r#"{"objects": {"Alice": {"copper": 1.5}}}"#,
        r#"{"objects": {"Alice": {"electrum": 1}}}"#,
        r#"{"objects": {"": {"copper": 1}}}"#,
        r#"{"objects": ["Alice"]}"#,
        r#""just a string""#,
        "{",
    ];
    for doc in bad_documents {
        fs::write(&tmp, doc)?;
        let err = ledger.load().unwrap_err();
        assert!(matches!(err, ServiceError::CorruptData { .. }), "{doc}: {err}");
        assert_eq!(ledger.list_character_names(), vec!["Keep"], "{doc}");
    }
    Ok(())
}

#[test]
fn failed_save_rolls_back_each_mutation() -> anyhow::Result<()> {
    let tmp = tmp_path("rollback");
    let _cleanup = Cleanup(tmp.clone());
    fs::write(&tmp, r#"{"objects": {"Bob": {"copper": 1}}}"#)?;

    // bind the ledger under a path whose parent is a regular file so every save fails
    let mut ledger = Ledger::new(tmp.join("data.json"));
    ledger.load_from(&tmp)?;

    assert!(matches!(ledger.add_character("Eve"), Err(ServiceError::Io { .. })));
    assert!(!ledger.contains("Eve"));

    assert!(matches!(ledger.adjust_balance("Bob", "copper", 10), Err(ServiceError::Io { .. })));
    assert_eq!(ledger.balances("Bob")?.copper, 1);

    assert!(matches!(ledger.delete_character("Bob"), Err(ServiceError::Io { .. })));
    assert!(ledger.contains("Bob"));
    Ok(())
}

#[test]
fn saved_file_uses_objects_shape() -> anyhow::Result<()> {
    let tmp = tmp_path("shape");
    let _cleanup = Cleanup(tmp.clone());
    let mut ledger = Ledger::new(&tmp);
    ledger.add_character("Bob")?;
    ledger.adjust_balance("Bob", "platinum", 2)?;

    let doc: serde_json::Value = serde_json::from_slice(&fs::read(&tmp)?)?;
    assert_eq!(
        doc,
        serde_json::json!({"objects": {"Bob": {"copper": 0, "silver": 0, "gold": 0, "platinum": 2}}})
    );
    Ok(())
}
