//! Domain pipeline
//!
//! - `Pipeline`: bounded concurrent crawl, join barrier, then per-domain
//!   extraction and geocoding
//! - `TaskSlots`: semaphore-backed task admission with peak tracking
//! - `resolve_domain`: first-resolving-page search for one domain

mod coordinator;
mod resolve;
mod slots;

pub use coordinator::{Pipeline, RunReport};
pub use resolve::resolve_domain;
pub use slots::{TaskSlot, TaskSlots};

use crate::config::Config;
use crate::crawler::RandomUserAgents;
use crate::ScoutError;
use std::sync::Arc;

/// Runs the pipeline with the configured geocoder and a random user-agent pool
///
/// # Arguments
///
/// * `config` - The run configuration
/// * `domains` - Bare domains to investigate
/// * `user_agents` - User-agent pool; empty falls back to a built-in agent
///
/// # Returns
///
/// * `Ok(RunReport)` - Records and statistics of the run
/// * `Err(ScoutError)` - The HTTP clients or patterns could not be built
pub async fn run(
    config: &Config,
    domains: &[String],
    user_agents: Vec<String>,
) -> Result<RunReport, ScoutError> {
    let pipeline = Pipeline::new(config, Arc::new(RandomUserAgents::new(user_agents)))?;
    Ok(pipeline.run(domains).await)
}
