// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use evsync_core::{Database, Job, JobRun, SyncEvent};

use super::queue::{EventQueue, QueueError, QueueResult, SharedDatabase};

pub const TEST_JOB: &str = "job-test";

/// Wrap a database for sharing with a queue.
pub fn shared(db: Database) -> SharedDatabase {
    Arc::new(Mutex::new(db))
}

/// Record one job run through the monitored write path, returning its event id.
pub fn record_run(db: &mut Database) -> i64 {
    if !db.job_exists(TEST_JOB).unwrap() {
        db.create_job(&Job::new(TEST_JOB.into(), "Test job".into(), Utc::now()))
            .unwrap();
    }
    let run = JobRun::new(TEST_JOB.into(), "test".into(), Utc::now());
    db.create_job_run(&run).unwrap().unwrap()
}

/// In-memory database with capture registered and `count` captured events.
pub fn seeded_database(count: usize) -> (Database, Vec<i64>) {
    let mut db = Database::open_in_memory().unwrap();
    db.capture_hook().register();
    let ids = (0..count).map(|_| record_run(&mut db)).collect();
    (db, ids)
}

/// In-memory queue with failure injection.
#[derive(Default)]
pub struct MemoryQueue {
    events: Mutex<BTreeMap<i64, String>>,
    /// Ids whose deletion fails.
    failing_deletes: Mutex<HashSet<i64>>,
    /// Whether enumeration fails.
    failing_scan: Mutex<bool>,
}

impl MemoryQueue {
    /// Queue holding one event per body, with ids starting at 1.
    pub fn with_bodies(bodies: &[&str]) -> Arc<Self> {
        let queue = MemoryQueue::default();
        {
            let mut events = queue.events.lock().unwrap();
            for (i, body) in bodies.iter().enumerate() {
                events.insert(i as i64 + 1, (*body).to_string());
            }
        }
        Arc::new(queue)
    }

    pub fn push(&self, id: i64, body: &str) {
        self.events.lock().unwrap().insert(id, body.to_string());
    }

    pub fn ids(&self) -> Vec<i64> {
        self.events.lock().unwrap().keys().copied().collect()
    }

    pub fn fail_delete(&self, id: i64) {
        self.failing_deletes.lock().unwrap().insert(id);
    }

    pub fn set_scan_fail(&self, fail: bool) {
        *self.failing_scan.lock().unwrap() = fail;
    }
}

impl EventQueue for MemoryQueue {
    fn for_each_pending(
        &self,
        visit: &mut dyn FnMut(&SyncEvent) -> QueueResult<()>,
    ) -> QueueResult<()> {
        if *self.failing_scan.lock().unwrap() {
            return Err(QueueError::Storage(evsync_core::Error::CorruptedData(
                "scan failure".into(),
            )));
        }
        let snapshot: Vec<SyncEvent> = self
            .events
            .lock()
            .unwrap()
            .iter()
            .map(|(id, body)| SyncEvent {
                id: *id,
                body: body.clone(),
                created_at: Utc::now(),
            })
            .collect();
        for event in &snapshot {
            visit(event)?;
        }
        Ok(())
    }

    fn delete(&self, id: i64) -> QueueResult<()> {
        if self.failing_deletes.lock().unwrap().contains(&id) {
            return Err(QueueError::Storage(evsync_core::Error::CorruptedData(
                format!("delete failure for {id}"),
            )));
        }
        match self.events.lock().unwrap().remove(&id) {
            Some(_) => Ok(()),
            None => Err(QueueError::Storage(
                evsync_core::Error::SyncEventNotFound(id),
            )),
        }
    }
}
