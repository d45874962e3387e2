// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which repository backend the engine persists to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StoreKind {
    /// A genuine in-process store; state does not outlive the engine.
    Memory,
    /// A relational store reached through `connection_url`.
    Database,
}

/// Consistency posture the engine documents and operates under.
///
/// `AtMostOnce` is the only value honoured today; the variant exists so a
/// future stronger mode has somewhere to land without a breaking config
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsistencyMode {
    AtMostOnce,
}

impl Default for ConsistencyMode {
    fn default() -> Self {
        Self::AtMostOnce
    }
}

fn default_tick() -> Duration {
    Duration::from_secs(60)
}

fn default_heartbeat() -> Duration {
    Duration::from_secs(30)
}

/// Top-level engine configuration, normally loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub store_kind: StoreKind,

    /// Connection string for `StoreKind::Database`; ignored for `Memory`.
    /// Scheme (`postgres://`, `mysql://`, `sqlite://`) selects the driver.
    #[serde(default)]
    pub connection_url: String,

    #[serde(default)]
    pub consistency_mode: ConsistencyMode,

    /// Store logger verbosity; `0` defaults to `Error`.
    #[serde(default)]
    pub log_level: u8,

    /// Enable the past-schedule (missed one-shot) watcher.
    #[serde(default)]
    pub watch_past: bool,

    /// Fire both schedule watchers once at startup before the first tick.
    #[serde(default)]
    pub run_immediately: bool,

    #[serde(default = "default_tick", with = "humantime_serde")]
    pub tick_duration: Duration,

    #[serde(default = "default_heartbeat", with = "humantime_serde")]
    pub heartbeat_period: Duration,

    /// Prefix applied to every table name, for sharing a database among
    /// multiple deployments.
    #[serde(default)]
    pub table_prefix: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            store_kind: StoreKind::Memory,
            connection_url: String::new(),
            consistency_mode: ConsistencyMode::default(),
            log_level: 0,
            watch_past: false,
            run_immediately: false,
            tick_duration: default_tick(),
            heartbeat_period: default_heartbeat(),
            table_prefix: String::new(),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
