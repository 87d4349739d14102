//! User-agent rotation
//!
//! Sites under investigation are fetched with a browser-like user agent drawn
//! from a pool, so that repeated requests look less like a single bot.

/// Used when no user agents are configured
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Strategy for choosing the user agent of the next request
pub trait UserAgentSource: Send + Sync {
    fn next(&self) -> String;
}

/// Picks a user agent uniformly at random from a fixed pool
#[derive(Debug, Clone)]
pub struct RandomUserAgents {
    agents: Vec<String>,
}

impl RandomUserAgents {
    /// Creates a pool from the given strings
    ///
    /// Blank entries are dropped. An empty pool falls back to
    /// [`DEFAULT_USER_AGENT`].
    pub fn new(agents: Vec<String>) -> Self {
        let mut agents: Vec<String> = agents
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();

        if agents.is_empty() {
            agents.push(DEFAULT_USER_AGENT.to_string());
        }

        Self { agents }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl UserAgentSource for RandomUserAgents {
    fn next(&self) -> String {
        self.agents[rand::random_range(0..self.agents.len())].clone()
    }
}

/// Always returns the same user agent
#[derive(Debug, Clone)]
pub struct FixedUserAgent(pub String);

impl UserAgentSource for FixedUserAgent {
    fn next(&self) -> String {
        self.0.clone()
    }
}
