// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wire representation of job runs sent to the collector.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::capture::Monitored;
use crate::run::{JobRun, RunStatus};

/// Collector-facing view of a [`JobRun`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncJobRunPresenter<'a> {
    pub run_id: &'a str,
    pub job_id: &'a str,
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
    pub initiator: InitiatorPresenter<'a>,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct InitiatorPresenter<'a> {
    #[serde(rename = "type")]
    pub kind: &'a str,
}

impl<'a> SyncJobRunPresenter<'a> {
    pub fn new(run: &'a JobRun) -> Self {
        SyncJobRunPresenter {
            run_id: &run.id,
            job_id: &run.job_id,
            status: run.status,
            error: run.error.as_deref(),
            initiator: InitiatorPresenter {
                kind: &run.initiator,
            },
            created_at: run.created_at,
            finished_at: run.finished_at,
        }
    }
}

impl Monitored for JobRun {
    type Presenter<'a> = SyncJobRunPresenter<'a>;

    fn present(&self) -> SyncJobRunPresenter<'_> {
        SyncJobRunPresenter::new(self)
    }
}

#[cfg(test)]
#[path = "presenter_tests.rs"]
mod tests;
