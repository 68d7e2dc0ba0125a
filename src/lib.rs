//! Hotel guest feedback taxonomy.
//!
//! Keywords (`"<Department> - <Aspect>"`) and problems are enriched with
//! semantic context and embedded once by the [`orchestrator`]. Guest comments
//! are then classified by the [`classifier`]: candidates recalled by embedding
//! similarity are checked against the department map in [`validation`] and
//! reordered by [`rerank`].

pub mod classifier;
pub mod config;
pub mod eid;
pub mod frequency;
pub mod orchestrator;
pub mod rerank;
pub mod semantic;
pub mod storage;
pub mod taxonomy;
pub mod validation;
pub mod version;

#[cfg(test)]
mod tests;
