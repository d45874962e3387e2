// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn defaults_are_memory_backed_and_conservative() {
    let config = EngineConfig::default();
    assert_eq!(config.store_kind, StoreKind::Memory);
    assert!(!config.watch_past);
    assert!(!config.run_immediately);
    assert_eq!(config.tick_duration, Duration::from_secs(60));
}

#[test]
fn deserializes_from_toml() {
    let toml = r#"
        store_kind = "DATABASE"
        connection_url = "postgres://localhost/scheduler"
        watch_past = true
        run_immediately = true
        tick_duration = "1s"
        table_prefix = "sched_"
    "#;
    let config: EngineConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.store_kind, StoreKind::Database);
    assert_eq!(config.tick_duration, Duration::from_secs(1));
    assert_eq!(config.table_prefix, "sched_");
}
