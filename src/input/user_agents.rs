//! User-agent list reader

use crate::config::UserAgentsConfig;
use crate::ScoutError;
use std::path::Path;

/// Reads a newline-delimited user-agent file
///
/// Blank lines and `#` comments are skipped.
pub fn load_user_agents(path: &Path) -> Result<Vec<String>, ScoutError> {
    let content = std::fs::read_to_string(path).map_err(|e| ScoutError::Input {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    Ok(parse_user_agents(&content))
}

/// Parses user-agent file content; see [`load_user_agents`]
pub fn parse_user_agents(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Builds the user-agent pool for a run
///
/// Combines the inline `agents`, the file named by `path`, and an optional
/// extra file (e.g. from the command line), in that order.
pub fn collect_user_agents(
    config: &UserAgentsConfig,
    extra: Option<&Path>,
) -> Result<Vec<String>, ScoutError> {
    let mut agents = config.agents.clone();

    if let Some(path) = &config.path {
        agents.extend(load_user_agents(Path::new(path))?);
    }
    if let Some(path) = extra {
        agents.extend(load_user_agents(path)?);
    }

    tracing::debug!("User-agent pool has {} entries", agents.len());
    Ok(agents)
}
