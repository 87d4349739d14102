//! Address module
//!
//! - `AddressExtractor`: regex heuristics finding street and postal-code
//!   candidates in page text
//! - `reconcile`: merges the geocoded candidates into one address
//! - `Address` / `AddressRecord`: the structured output

mod extractor;
mod reconcile;
mod types;

pub use extractor::{text_nodes, AddressExtractor, ExtractError, TextNode};
pub use reconcile::reconcile;
pub use types::{Address, AddressRecord, ExtractedCandidates};
