// src/workflow/argo.rs

//! Conversion of a workflow document into an Argo `Workflow` manifest.

use serde::Serialize;

use super::document::WorkflowDocument;
use crate::errors::Result;

const TASK_TEMPLATE: &str = "task";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArgoWorkflow {
    pub api_version: &'static str,
    pub kind: &'static str,
    pub metadata: Metadata,
    pub spec: Spec,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub generate_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Spec {
    pub entrypoint: String,
    #[serde(rename = "podGC")]
    pub pod_gc: PodGc,
    pub ttl_strategy: TtlStrategy,
    pub templates: Vec<Template>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PodGc {
    pub strategy: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TtlStrategy {
    pub seconds_after_completion: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Template {
    Container { name: String, container: Container },
    Dag { name: String, dag: DagTemplate },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub image: String,
    pub image_pull_policy: &'static str,
    pub resources: Resources,
}

#[derive(Debug, Clone, Serialize)]
pub struct Resources {
    pub limits: ResourceList,
    pub requests: ResourceList,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceList {
    pub cpu: &'static str,
    pub memory: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DagTemplate {
    pub tasks: Vec<DagTask>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DagTask {
    pub name: String,
    pub template: &'static str,
    pub dependencies: Vec<String>,
}

impl ArgoWorkflow {
    /// Every task runs the same container template; the DAG template is
    /// named after the workflow and is the entrypoint.
    pub fn from_document(doc: &WorkflowDocument, image: &str) -> Self {
        let tasks = doc
            .topology
            .iter()
            .map(|t| DagTask {
                name: t.name.clone(),
                template: TASK_TEMPLATE,
                dependencies: t.dependencies.clone(),
            })
            .collect();

        let container = Container {
            image: image.to_string(),
            image_pull_policy: "IfNotPresent",
            resources: Resources {
                limits: ResourceList {
                    cpu: "2000m",
                    memory: "128Mi",
                },
                requests: ResourceList {
                    cpu: "1000m",
                    memory: "64Mi",
                },
            },
        };

        Self {
            api_version: "argoproj.io/v1alpha1",
            kind: "Workflow",
            metadata: Metadata {
                generate_name: "argo-test-wf-".to_string(),
            },
            spec: Spec {
                entrypoint: doc.workflow_name.clone(),
                pod_gc: PodGc {
                    strategy: "OnPodSuccess",
                },
                ttl_strategy: TtlStrategy {
                    seconds_after_completion: 60,
                },
                templates: vec![
                    Template::Container {
                        name: TASK_TEMPLATE.to_string(),
                        container,
                    },
                    Template::Dag {
                        name: doc.workflow_name.clone(),
                        dag: DagTemplate { tasks },
                    },
                ],
            },
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Parse a JSON workflow document and render it as Argo YAML.
pub fn json_to_argo_yaml(json: &str, image: &str) -> Result<String> {
    let doc = WorkflowDocument::from_json(json)?;
    ArgoWorkflow::from_document(&doc, image).to_yaml()
}
