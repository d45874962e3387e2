// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Job` trait and the process-wide name → factory registry.

use std::collections::HashMap;
use std::sync::Arc;

use cronmesh_core::job_data::JobData;
use parking_lot::RwLock;

/// User-implemented schedulable unit.
///
/// One instance is constructed (via the registry's factory) per execution
/// attempt — state does not carry over between runs except through
/// `job_data`, which the watcher persists and replays.
pub trait Job: Send {
    /// The name this job is registered and looked up under.
    fn job_name(&self) -> &str;

    /// Run the job body. Panicking here is caught by the dispatcher and
    /// recorded as a failed execution; it does not crash the watcher.
    fn execute(&mut self, job_data: JobData);

    /// Data to snapshot forward into the next occurrence's `job_data`.
    fn job_data(&self) -> JobData;
}

type JobFactory = Arc<dyn Fn() -> Box<dyn Job> + Send + Sync>;

/// Name → job-factory lookup, populated once at startup via [`JobRegistry::register`].
#[derive(Clone, Default)]
pub struct JobRegistry {
    factories: Arc<RwLock<HashMap<String, JobFactory>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `job_name`. Re-registering the same name
    /// replaces the previous factory.
    pub fn register(&self, job_name: impl Into<String>, factory: impl Fn() -> Box<dyn Job> + Send + Sync + 'static) {
        self.factories.write().insert(job_name.into(), Arc::new(factory));
    }

    /// Construct a fresh instance of the job registered under `job_name`.
    pub fn build(&self, job_name: &str) -> Option<Box<dyn Job>> {
        self.factories.read().get(job_name).map(|factory| factory())
    }

    pub fn contains(&self, job_name: &str) -> bool {
        self.factories.read().contains_key(job_name)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
