// src/replay/special.rs

//! Twin workflows: one DAG emitted twice, once customized and once plain,
//! sent to the scheduler a fixed interval apart.

use std::time::Duration;

use rand::Rng;
use tracing::info;

use super::sink::{Target, WorkflowSink};
use crate::config::GenerateSection;
use crate::dag::{DagBuilder, NodeCountCurve};
use crate::errors::{DagSynthError, Result};
use crate::types::SpecialMode;
use crate::workflow::{Customization, WorkflowDocument, proto};

/// Binary encodings of the same workflow, differing only in their tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TwinPair {
    pub customization: Customization,
    pub customized: Vec<u8>,
    pub plain: Vec<u8>,
}

/// Build one DAG and encode both halves of the twin.
pub fn build_pair<R: Rng + ?Sized>(
    cfg: &GenerateSection,
    mode: SpecialMode,
    rng: &mut R,
) -> Result<TwinPair> {
    let customization = Customization::special(mode).ok_or_else(|| {
        DagSynthError::InvalidParameter("twin mode needs --special time or cost".to_string())
    })?;

    let curve = NodeCountCurve::fit(cfg.curve_points())?;
    let dag = DagBuilder::new(cfg.dag_params(), curve).build(rng);
    let doc = WorkflowDocument::from_graph(&dag.graph, &cfg.task_template(), rng);

    Ok(TwinPair {
        customization,
        customized: proto::encode(&doc, &customization),
        plain: proto::encode(&doc, &Customization::plain()),
    })
}

/// Customized twin first, then the plain one after `wait_secs`.
pub async fn run_pair<S: WorkflowSink + ?Sized>(
    pair: &TwinPair,
    wait_secs: f64,
    sink: &mut S,
) -> Result<()> {
    sink.submit(Target::Scheduler, vec![pair.customized.clone()])
        .await?;
    info!(
        cost_grade = pair.customization.cost_grade_str(),
        time_grade = pair.customization.time_grade_str(),
        "sent customized twin"
    );

    if wait_secs > 0.0 {
        tokio::time::sleep(Duration::from_secs_f64(wait_secs)).await;
    }

    sink.submit(Target::Scheduler, vec![pair.plain.clone()]).await?;
    info!("sent plain twin");
    Ok(())
}
