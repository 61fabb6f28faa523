//! Persist and Resume
//!
//! This example demonstrates write-through persistence and hydration.
//!
//! Key concepts:
//! - Persistence middleware that runs last in the chain
//! - Hydrating a new store from what a previous one wrote
//! - Atomic file writes (temp file, then rename)
//! - JSON for readability, binary for compactness
//!
//! Run with: cargo run --example persist_resume

use mindstore::persist::{self, Codec, FileStorage, PersistOptions};
use mindstore::StoreBuilder;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Session {
    user: String,
    open_tabs: Vec<String>,
}

impl Session {
    fn empty() -> Self {
        Self {
            user: "guest".to_string(),
            open_tabs: Vec::new(),
        }
    }
}

fn main() {
    println!("=== Persist and Resume Example ===\n");

    let dir = tempfile::tempdir().expect("temp dir");
    println!("Storage directory: {}\n", dir.path().display());

    // Run 1: start from scratch and record some work
    println!("Run 1: Fresh session");
    {
        let store = StoreBuilder::new()
            .initial(Session::empty())
            .persist_to_dir(dir.path(), "session")
            .expect("valid key")
            .build()
            .expect("initial state set");
        println!("  Hydrated: {:?}", store.get());

        store
            .update(|s| Session {
                user: "ada".to_string(),
                ..s.clone()
            })
            .unwrap();
        for tab in ["inbox", "calendar"] {
            store
                .update(|s| {
                    let mut next = s.clone();
                    next.open_tabs.push(tab.to_string());
                    next
                })
                .unwrap();
        }
        println!("  Final state: {:?}", store.get());
    }

    // Run 2: a new store picks up where the first left off
    println!("\nRun 2: Resume");
    let resumed = StoreBuilder::new()
        .initial(Session::empty())
        .persist_to_dir(dir.path(), "session")
        .expect("valid key")
        .build()
        .expect("initial state set");
    println!("  Hydrated: {:?}", resumed.get());
    println!("  Chain: {:?}", resumed.pipeline().names());

    // Binary codec for compact storage
    println!("\nBinary codec");
    let storage = Arc::new(FileStorage::new(dir.path()).expect("storage dir"));
    let json = PersistOptions::new("session", storage.clone());
    let binary = PersistOptions::new("session-bin", storage).codec(Codec::Binary);
    persist::save(&binary, &*resumed.get()).expect("binary save");

    let json_size = std::fs::metadata(dir.path().join("session.state")).map(|m| m.len());
    let bin_size = std::fs::metadata(dir.path().join("session-bin.state")).map(|m| m.len());
    println!("  JSON envelope:   {:?} bytes", json_size);
    println!("  Binary envelope: {:?} bytes", bin_size);

    let reloaded: Option<Session> = persist::load(&json).expect("readable");
    println!("  Reloaded from JSON: {:?}", reloaded);
}
