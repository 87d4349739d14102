//! Input file readers
//!
//! - Domain lists (plain or headed comma-separated)
//! - User-agent pools

mod domains;
mod user_agents;

pub use domains::{load_domains, parse_domains};
pub use user_agents::{collect_user_agents, load_user_agents, parse_user_agents};
