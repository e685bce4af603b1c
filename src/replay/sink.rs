// src/replay/sink.rs

//! Where replayed workflows go.
//!
//! The replayer talks to a `WorkflowSink` instead of a concrete transport.
//! `SpoolSink` drops every payload into an outbox directory for an external
//! submitter to pick up; `NullSink` discards them for dry runs. Tests plug in
//! a recording sink.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use tracing::trace;

use crate::errors::Result;
use crate::fs::FileSystem;

/// Replay destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Target {
    /// Scheduler controller; takes protobuf-encoded workflows in batches.
    Scheduler,
    /// Argo; takes one YAML manifest per submission.
    Argo,
}

impl Target {
    /// Value of the `type` column in the metrics CSV.
    pub fn label(self) -> &'static str {
        match self {
            Target::Scheduler => "core",
            Target::Argo => "argo",
        }
    }

    fn spool_dir(self) -> &'static str {
        match self {
            Target::Scheduler => "scheduler",
            Target::Argo => "argo",
        }
    }

    fn spool_ext(self) -> &'static str {
        match self {
            Target::Scheduler => "data",
            Target::Argo => "yaml",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Trait abstracting how workflows are submitted.
///
/// One call is one timed submission: the scheduler target receives a whole
/// batch at once, Argo receives a single manifest per call.
pub trait WorkflowSink: Send {
    fn submit(
        &mut self,
        target: Target,
        payloads: Vec<Vec<u8>>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

impl<S: WorkflowSink + ?Sized> WorkflowSink for Box<S> {
    fn submit(
        &mut self,
        target: Target,
        payloads: Vec<Vec<u8>>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        (**self).submit(target, payloads)
    }
}

/// Writes each payload to `<outbox>/<scheduler|argo>/<seq>.<data|yaml>`.
#[derive(Debug)]
pub struct SpoolSink<F> {
    fs: F,
    outbox: PathBuf,
    seq: u64,
}

impl<F: FileSystem> SpoolSink<F> {
    pub fn new(fs: F, outbox: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            outbox: outbox.into(),
            seq: 0,
        }
    }

    /// Number of payloads spooled so far.
    pub fn spooled(&self) -> u64 {
        self.seq
    }
}

impl<F: FileSystem> WorkflowSink for SpoolSink<F> {
    fn submit(
        &mut self,
        target: Target,
        payloads: Vec<Vec<u8>>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let dir = self.outbox.join(target.spool_dir());
            self.fs.create_dir_all(&dir)?;
            for payload in payloads {
                let path = dir.join(format!("{}.{}", self.seq, target.spool_ext()));
                self.fs.write(&path, &payload)?;
                trace!(?path, bytes = payload.len(), "spooled workflow");
                self.seq += 1;
            }
            Ok(())
        })
    }
}

/// Accepts and drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink {
    pub accepted: u64,
}

impl WorkflowSink for NullSink {
    fn submit(
        &mut self,
        _target: Target,
        payloads: Vec<Vec<u8>>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        self.accepted += payloads.len() as u64;
        Box::pin(async { Ok(()) })
    }
}
