//! State module for tracking pipeline progress
//!
//! - `DomainStage`: the stage a domain is in (pending, crawling, extracting, ...)
//! - `DomainProgress`: a domain plus its stage, with checked transitions

mod domain_stage;

pub use domain_stage::{DomainProgress, DomainStage};
