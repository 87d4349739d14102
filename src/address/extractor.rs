//! Regex heuristics for address-shaped text
//!
//! The extractor scans the distinct text nodes of a page (script and style
//! content excluded) and returns the first street-address match and the
//! first postal-code match. Text nodes above the configured length are
//! skipped: long paragraphs are prose, not addresses.

use crate::address::types::ExtractedCandidates;
use crate::config::ExtractorConfig;
use crate::ConfigError;
use regex::Regex;
use scraper::Html;
use std::collections::HashSet;
use thiserror::Error;

/// Elements whose text content is never address text
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// ZIP or ZIP+4, as a whole word
const POSTAL_CODE_PATTERN: &str = r"\b\d{5}(?:-\d{4}| \d{4})?\b";

/// "PO Box", "P.O. Box", "P O Box", any case
const PO_BOX_PATTERN: &str = r"(?i)\bp\.?\s*o\.?\s*box\b";

/// Reasons a page yielded no candidates
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("Page has no text content")]
    EmptyPage,

    #[error("No street or postal code found")]
    NoMatch,
}

/// Compiled address patterns
#[derive(Debug, Clone)]
pub struct AddressExtractor {
    street: Regex,
    postal_code: Regex,
    po_box: Regex,
    whitespace: Regex,
    max_text_length: usize,
}

impl AddressExtractor {
    /// Compiles the patterns for the configured road vocabulary
    pub fn new(config: &ExtractorConfig) -> Result<Self, ConfigError> {
        let street = build_street_pattern(&config.road_types)?;
        let compile =
            |pattern: &str| Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern(e.to_string()));

        Ok(Self {
            street,
            postal_code: compile(POSTAL_CODE_PATTERN)?,
            po_box: compile(PO_BOX_PATTERN)?,
            whitespace: compile(r"\s+")?,
            max_text_length: config.max_text_length,
        })
    }

    /// Extracts the first street and postal-code candidates from a page
    ///
    /// # Returns
    ///
    /// * `Ok(ExtractedCandidates)` - At least one of the two was found
    /// * `Err(ExtractError)` - The page has no text, or nothing matched
    pub fn extract(&self, html: &str) -> Result<ExtractedCandidates, ExtractError> {
        let nodes = text_nodes(html);
        if nodes.is_empty() {
            return Err(ExtractError::EmptyPage);
        }

        let candidates = ExtractedCandidates {
            street: self.first_match(&nodes, |text| self.find_street(text)),
            postal_code: self.first_match(&nodes, |text| self.find_postal_code(text)),
        };

        if candidates.street.is_none() && candidates.postal_code.is_none() {
            return Err(ExtractError::NoMatch);
        }

        Ok(candidates)
    }

    /// Finds a street address in one piece of text
    pub fn find_street(&self, text: &str) -> Option<String> {
        let captures = self.street.captures(text)?;
        let matched = captures.name("street")?.as_str();
        self.clean(matched)
    }

    /// Finds a ZIP / ZIP+4 code in one piece of text
    pub fn find_postal_code(&self, text: &str) -> Option<String> {
        let matched = self.postal_code.find(text)?.as_str();
        self.clean(matched)
    }

    /// Removes every PO Box marker and collapses whitespace
    ///
    /// Applied until nothing changes, so applying it twice gives the same
    /// result as applying it once.
    pub fn strip_po_box(&self, text: &str) -> String {
        let mut current = self.collapse_whitespace(text);
        loop {
            let stripped = self.po_box.replace_all(&current, " ");
            let next = self.collapse_whitespace(&stripped);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn first_match<F>(&self, nodes: &[TextNode], find: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        nodes
            .iter()
            .filter(|node| node.raw_length <= self.max_text_length)
            .find_map(|node| find(node.text.as_str()))
    }

    fn clean(&self, matched: &str) -> Option<String> {
        let cleaned = self.strip_po_box(matched);
        if cleaned.is_empty() {
            None
        } else {
            Some(cleaned)
        }
    }

    fn collapse_whitespace(&self, text: &str) -> String {
        self.whitespace.replace_all(text, " ").trim().to_string()
    }
}

/// Builds the street pattern around a road-type vocabulary
///
/// Shape: start of text or a separator, a 2-7 digit number, 5-30 characters,
/// a road-type word, then punctuation, whitespace, or end of text.
fn build_street_pattern(road_types: &[String]) -> Result<Regex, ConfigError> {
    let mut tokens: Vec<String> = road_types.iter().map(|t| regex::escape(t)).collect();
    // Longest first so "street" is preferred over "st"
    tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let pattern = format!(
        r"(?i)(?:^|[\s,;:(])(?P<street>\d{{2,7}}\b.{{5,30}}?\b(?:{}))(?:[.,;:)]|\s|$)",
        tokens.join("|")
    );

    Regex::new(&pattern).map_err(|e| ConfigError::InvalidPattern(e.to_string()))
}

/// One text node of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    /// The node text with surrounding whitespace trimmed
    pub text: String,

    /// Character count of the node before trimming
    ///
    /// The length cap applies to this, so indentation around a short
    /// address counts toward it.
    pub raw_length: usize,
}

/// Returns the distinct non-empty text nodes of a document
///
/// Nodes are distinct by trimmed text; the first occurrence is kept.
/// Text inside `script`, `style`, `noscript`, and `template` is skipped.
pub fn text_nodes(html: &str) -> Vec<TextNode> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut nodes = Vec::new();

    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let skipped = node
            .parent()
            .and_then(|parent| parent.value().as_element())
            .map(|element| SKIPPED_ELEMENTS.contains(&element.name()))
            .unwrap_or(false);
        if skipped {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() && seen.insert(trimmed.to_string()) {
            nodes.push(TextNode {
                text: trimmed.to_string(),
                raw_length: text.chars().count(),
            });
        }
    }

    nodes
}
