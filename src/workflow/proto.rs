// src/workflow/proto.rs

//! Binary workflow encoding (protobuf, via `prost` derive).
//!
//! Field numbers follow the scheduler's `Workflow` message.

use std::collections::HashMap;

use prost::Message;

use super::custom::Customization;
use super::document::WorkflowDocument;
use crate::errors::Result;

#[derive(Clone, PartialEq, Message)]
pub struct WorkflowMessage {
    #[prost(string, tag = "1")]
    pub workflow_name: String,
    #[prost(string, tag = "2")]
    pub custom_id: String,
    #[prost(string, tag = "3")]
    pub style: String,
    #[prost(message, repeated, tag = "4")]
    pub topology: Vec<TaskMessage>,
    #[prost(bool, tag = "5")]
    pub customization: bool,
    #[prost(string, tag = "6")]
    pub cost_grade: String,
    #[prost(string, tag = "7")]
    pub time_grade: String,
}

#[derive(Clone, PartialEq, Message)]
pub struct TaskMessage {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, repeated, tag = "2")]
    pub dependencies: Vec<String>,
    #[prost(string, tag = "3")]
    pub template: String,
    #[prost(int64, tag = "4")]
    pub duration: i64,
    #[prost(string, tag = "5")]
    pub phase: String,
    #[prost(string, tag = "6")]
    pub node_info: String,
    #[prost(int64, tag = "7")]
    pub cpu: i64,
    #[prost(int64, tag = "8")]
    pub mem: i64,
    #[prost(map = "string, string", tag = "9")]
    pub env: HashMap<String, String>,
}

impl WorkflowMessage {
    pub fn from_document(doc: &WorkflowDocument, customization: &Customization) -> Self {
        let topology = doc
            .topology
            .iter()
            .map(|task| TaskMessage {
                name: task.name.clone(),
                dependencies: task.dependencies.clone(),
                template: task.template.clone(),
                duration: task.duration as i64,
                phase: task.phase.clone(),
                node_info: task.node_info.clone(),
                cpu: i64::from(task.cpu),
                mem: task.mem as i64,
                env: task
                    .env
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            })
            .collect();

        Self {
            workflow_name: doc.workflow_name.clone(),
            custom_id: doc.custom_id.clone(),
            style: doc.style.clone(),
            topology,
            customization: customization.customized,
            cost_grade: customization.cost_grade_str().to_string(),
            time_grade: customization.time_grade_str().to_string(),
        }
    }
}

/// Encode a document plus its customization tag.
pub fn encode(doc: &WorkflowDocument, customization: &Customization) -> Vec<u8> {
    WorkflowMessage::from_document(doc, customization).encode_to_vec()
}

pub fn decode(bytes: &[u8]) -> Result<WorkflowMessage> {
    Ok(WorkflowMessage::decode(bytes)?)
}
