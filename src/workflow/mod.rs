// src/workflow/mod.rs

//! Serialized projections of a generated graph.
//!
//! - [`custom`] decides whether a workflow is customized and how.
//! - [`document`] builds the JSON workflow document.
//! - [`proto`] encodes the binary form sent to the scheduler.
//! - [`dot`] exports Graphviz source.
//! - [`argo`] turns a document into an Argo `Workflow` manifest.

pub mod argo;
pub mod custom;
pub mod document;
pub mod dot;
pub mod proto;

pub use custom::{Customization, Grade};
pub use document::{TaskSpec, TaskTemplate, WorkflowDocument};
