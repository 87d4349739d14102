//! URL handling module for Address Scout
//!
//! This module provides link normalization for contact/about pages and
//! domain extraction/normalization.

mod domain;
mod normalize;

pub use domain::{extract_domain, normalize_domain, same_site};
pub use normalize::{collect_contact_links, normalize_link};
