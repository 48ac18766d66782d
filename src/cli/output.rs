//! Output formatting for the `stow` CLI: plain text by default, JSON with
//! `--json`.

use serde_json::json;

use crate::sync::ChangeEvent;

pub fn print_value(key: &str, raw: Option<&str>, as_json: bool) {
    if as_json {
        println!(
            "{}",
            json!({
                "key": key,
                "value": raw.and_then(|r| serde_json::from_str::<serde_json::Value>(r).ok()),
                "present": raw.is_some(),
            })
        );
    } else {
        match raw {
            Some(raw) => println!("{raw}"),
            None => println!("(not set)"),
        }
    }
}

pub fn print_keys(keys: &[(String, usize)], as_json: bool) {
    if as_json {
        let entries: Vec<_> = keys
            .iter()
            .map(|(key, bytes)| json!({ "key": key, "bytes": bytes }))
            .collect();
        println!("{}", json!(entries));
    } else if keys.is_empty() {
        println!("(empty store)");
    } else {
        for (key, bytes) in keys {
            println!("{key}  ({bytes} bytes)");
        }
    }
}

pub fn print_change(event: &ChangeEvent, as_json: bool) {
    if as_json {
        println!(
            "{}",
            json!({
                "key": event.key,
                "value": event
                    .new_raw
                    .as_deref()
                    .and_then(|r| serde_json::from_str::<serde_json::Value>(r).ok()),
                "removed": event.new_raw.is_none(),
            })
        );
    } else {
        match &event.new_raw {
            Some(raw) => println!("{} = {}", event.key, raw),
            None => println!("{} (removed)", event.key),
        }
    }
}
