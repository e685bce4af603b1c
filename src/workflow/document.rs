// src/workflow/document.rs

//! JSON workflow document built from a generated graph.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dag::{Graph, task_name};

pub const WORKFLOW_NAME: &str = "NoName";
pub const WORKFLOW_STYLE: &str = "Normal";
const PLACEHOLDER: &str = "None";
const MIB: u64 = 1024 * 1024;

/// Per-task settings shared by every workflow of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskTemplate {
    /// Container image each task runs.
    pub image: String,
    /// Inclusive `[min, max]` task duration in seconds.
    pub duration_range: (u64, u64),
    /// CPU load the task image should generate, in percent.
    pub task_cpu: u32,
    /// Memory the task image should allocate, in MiB.
    pub task_mem: u64,
}

impl Default for TaskTemplate {
    fn default() -> Self {
        Self {
            image: "liudy093/task:latest".to_string(),
            duration_range: (30, 600),
            task_cpu: 0,
            task_mem: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    pub workflow_name: String,
    pub style: String,
    pub custom_id: String,
    pub topology: Vec<TaskSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    pub name: String,
    pub dependencies: Vec<String>,
    pub template: String,
    pub duration: u64,
    pub phase: String,
    pub node_info: String,
    pub cpu: u32,
    /// Memory request in bytes.
    pub mem: u64,
    pub env: BTreeMap<String, String>,
}

impl WorkflowDocument {
    /// One task per node, layer by layer, with a fresh `custom_id`.
    pub fn from_graph<R: Rng + ?Sized>(graph: &Graph, template: &TaskTemplate, rng: &mut R) -> Self {
        let (min_mem, max_mem) = if template.task_mem > 0 {
            let lo = template.task_mem.saturating_mul(MIB);
            (lo, lo.saturating_mul(2))
        } else {
            (512 * MIB, 1024 * MIB)
        };
        let (min_dur, max_dur) = template.duration_range;

        let env = BTreeMap::from([
            ("CPU_CONSUME".to_string(), template.task_cpu.to_string()),
            ("MEMORY_CONSUME".to_string(), template.task_mem.to_string()),
        ]);

        let topology = graph
            .nodes()
            .map(|node| TaskSpec {
                name: task_name(node),
                dependencies: graph.dependencies_of(node),
                template: template.image.clone(),
                duration: rng.gen_range(min_dur..=max_dur),
                phase: PLACEHOLDER.to_string(),
                node_info: PLACEHOLDER.to_string(),
                cpu: rng.gen_range(1..=4),
                mem: rng.gen_range(min_mem..=max_mem),
                env: env.clone(),
            })
            .collect();

        Self {
            workflow_name: WORKFLOW_NAME.to_string(),
            style: WORKFLOW_STYLE.to_string(),
            custom_id: Uuid::new_v4().to_string(),
            topology,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn diamond() -> Graph {
        let mut g = Graph::new();
        g.push_layer(1);
        g.push_layer(2);
        g.push_layer(1);
        g.add_edge(0, 1);
        g.add_edge(0, 2);
        g.add_edge(1, 3);
        g.add_edge(2, 3);
        g
    }

    #[test]
    fn tasks_follow_layers_and_dependencies() {
        let template = TaskTemplate {
            image: "task:1".into(),
            duration_range: (10, 25),
            task_cpu: 50,
            task_mem: 64,
        };
        let doc = WorkflowDocument::from_graph(&diamond(), &template, &mut StdRng::seed_from_u64(3));

        assert_eq!(doc.workflow_name, "NoName");
        assert_eq!(doc.style, "Normal");
        assert!(Uuid::parse_str(&doc.custom_id).is_ok());

        let names: Vec<_> = doc.topology.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["t0", "t1", "t2", "t3"]);
        assert!(doc.topology[0].dependencies.is_empty());
        assert_eq!(doc.topology[3].dependencies, vec!["t1", "t2"]);

        for task in &doc.topology {
            assert!((10..=25).contains(&task.duration));
            assert!((1..=4).contains(&task.cpu));
            assert!((64 * MIB..=128 * MIB).contains(&task.mem));
            assert_eq!(task.template, "task:1");
            assert_eq!(task.env["CPU_CONSUME"], "50");
            assert_eq!(task.env["MEMORY_CONSUME"], "64");
        }
    }

    #[test]
    fn json_uses_wire_field_names() {
        let doc = WorkflowDocument::from_graph(
            &diamond(),
            &TaskTemplate::default(),
            &mut StdRng::seed_from_u64(4),
        );
        let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(value["workflow_name"], "NoName");
        assert_eq!(value["topology"][3]["dependencies"][0], "t1");
        assert_eq!(value["topology"][0]["node_info"], "None");

        let back = WorkflowDocument::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(back, doc);
    }
}
