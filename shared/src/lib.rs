//! Pre- and post-labeling hooks for SageMaker Ground Truth custom labeling jobs.

pub mod config;
pub mod consolidation;
pub mod error;
pub mod pre_task;
pub mod presign;
pub mod storage;
pub mod task;

#[cfg(test)]
mod testing;
