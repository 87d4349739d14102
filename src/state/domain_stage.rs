/// Domain stage definitions for tracking pipeline progress
///
/// Each input domain walks a fixed path through the pipeline:
///
/// ```text
/// Pending -> Crawling -> {CrawledEmpty | CrawledWithPages} -> Extracting -> {Resolved | Unresolved}
/// ```
use crate::ScoutError;
use std::fmt;

/// Represents the current stage of a domain in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainStage {
    // ===== Active Stages =====
    /// Domain is waiting for a crawl slot
    Pending,

    /// Home page and contact pages are being fetched
    Crawling,

    /// Crawl finished without a single usable page
    CrawledEmpty,

    /// Crawl finished with at least one page
    CrawledWithPages,

    /// Pages are being scanned and geocoded
    Extracting,

    // ===== Terminal Stages =====
    /// An address record was produced
    Resolved,

    /// No page produced an address
    Unresolved,
}

impl DomainStage {
    /// Returns true if this is a terminal stage
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Unresolved)
    }

    /// Returns true if moving from this stage to `next` is allowed
    pub fn can_transition_to(&self, next: DomainStage) -> bool {
        use DomainStage::*;
        matches!(
            (self, next),
            (Pending, Crawling)
                | (Crawling, CrawledEmpty)
                | (Crawling, CrawledWithPages)
                | (CrawledEmpty, Extracting)
                | (CrawledWithPages, Extracting)
                | (Extracting, Resolved)
                | (Extracting, Unresolved)
        )
    }

    /// Converts the stage to its log/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Crawling => "crawling",
            Self::CrawledEmpty => "crawled_empty",
            Self::CrawledWithPages => "crawled_with_pages",
            Self::Extracting => "extracting",
            Self::Resolved => "resolved",
            Self::Unresolved => "unresolved",
        }
    }
}

impl fmt::Display for DomainStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks one domain's stage and enforces legal transitions
#[derive(Debug, Clone)]
pub struct DomainProgress {
    domain: String,
    stage: DomainStage,
}

impl DomainProgress {
    /// Creates progress for a domain in the `Pending` stage
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            stage: DomainStage::Pending,
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn stage(&self) -> DomainStage {
        self.stage
    }

    /// Moves the domain to `next`
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The transition was legal and applied
    /// * `Err(ScoutError::InvalidTransition)` - The stage is left unchanged
    pub fn advance(&mut self, next: DomainStage) -> Result<(), ScoutError> {
        if !self.stage.can_transition_to(next) {
            return Err(ScoutError::InvalidTransition {
                domain: self.domain.clone(),
                from: self.stage,
                to: next,
            });
        }

        tracing::trace!("{}: {} -> {}", self.domain, self.stage, next);
        self.stage = next;
        if next.is_terminal() {
            tracing::debug!("{} finished as {}", self.domain, next);
        }
        Ok(())
    }
}
