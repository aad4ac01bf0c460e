// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! evsync-core: storage and capture primitives for event synchronization.
//!
//! This crate provides the SQLite store, the monitored entities and their
//! wire presenters, the capture step that queues sync events transactionally,
//! and the protocol shared by the pusher and the collector.

pub mod capture;
pub mod db;
pub mod error;
pub mod event;
pub mod presenter;
pub mod protocol;
pub mod run;

pub use capture::{CaptureHook, Monitored};
pub use db::Database;
pub use error::{Error, Result};
pub use event::SyncEvent;
pub use presenter::SyncJobRunPresenter;
pub use protocol::{Response, STATUS_CREATED};
pub use run::{Job, JobRun, RunStatus};
