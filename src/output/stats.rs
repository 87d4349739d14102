//! Run statistics
//!
//! Counters collected by the pipeline while it runs and printed as the
//! final summary.

use std::time::Duration;

/// Summary of one pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Unique domains submitted to the run
    pub domains_in: usize,

    /// Domains whose crawl produced at least one page
    pub domains_crawled: usize,

    /// Pages retained across all domains, home pages included
    pub pages_fetched: usize,

    /// Domains that produced an address record
    pub addresses_out: usize,

    /// Crawled domains whose pages never resolved to an address
    pub unresolved: usize,

    /// Highest number of crawl tasks observed in flight at once
    pub peak_concurrent_crawls: usize,

    /// Requests sent to the geocoding service, retries included
    pub geocode_requests: u64,

    /// Wall-clock time of the run
    pub elapsed: Duration,
}

impl RunStatistics {
    /// Share of input domains that produced an address, in percent
    pub fn resolution_rate(&self) -> f64 {
        if self.domains_in == 0 {
            0.0
        } else {
            (self.addresses_out as f64 / self.domains_in as f64) * 100.0
        }
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Run Statistics ===\n");

    println!("Crawl:");
    println!("  Domains in: {}", stats.domains_in);
    println!("  Domains crawled: {}", stats.domains_crawled);
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!("  Peak concurrent crawls: {}", stats.peak_concurrent_crawls);
    println!();

    println!("Extraction:");
    println!("  Addresses out: {}", stats.addresses_out);
    println!("  Unresolved: {}", stats.unresolved);
    println!("  Geocoding requests: {}", stats.geocode_requests);
    println!();

    println!(
        "Resolution Rate: {:.1}% ({} / {} domains) in {:.1}s",
        stats.resolution_rate(),
        stats.addresses_out,
        stats.domains_in,
        stats.elapsed.as_secs_f64()
    );
}
