use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use dagsynth::errors::Result;
use dagsynth::replay::{Target, WorkflowSink};

/// One `submit` call as seen by the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub target: Target,
    pub payloads: Vec<Vec<u8>>,
}

/// A fake sink that records every submission in call order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    submissions: Arc<Mutex<Vec<Submission>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything submitted so far.
    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }

    /// Number of workflows (not calls) sent to `target`.
    pub fn workflows_for(&self, target: Target) -> usize {
        self.submissions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.target == target)
            .map(|s| s.payloads.len())
            .sum()
    }
}

impl WorkflowSink for RecordingSink {
    fn submit(
        &mut self,
        target: Target,
        payloads: Vec<Vec<u8>>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let submissions = Arc::clone(&self.submissions);

        Box::pin(async move {
            submissions
                .lock()
                .unwrap()
                .push(Submission { target, payloads });
            Ok(())
        })
    }
}
