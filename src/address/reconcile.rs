//! Merging of street-derived and postal-code-derived geocoding results

use crate::address::types::Address;
use crate::geocode::GeocodeResult;

/// Merges two geocoded candidates into one address
///
/// `road` prefers the street-derived value; every other field prefers the
/// postal-code-derived value. Each side falls back to the other when its own
/// value is missing.
///
/// # Returns
///
/// * `None` - Both inputs are absent, neither carries an address payload, or
///   the merged address has no field at all
/// * `Some(Address)` - The merged address
pub fn reconcile(street: Option<&GeocodeResult>, zip: Option<&GeocodeResult>) -> Option<Address> {
    if street.is_none() && zip.is_none() {
        return None;
    }

    let from_street = street.and_then(|r| r.address.as_ref());
    let from_zip = zip.and_then(|r| r.address.as_ref());

    if from_street.is_none() && from_zip.is_none() {
        return None;
    }

    let merged = Address {
        country: pick(from_zip, from_street, |a| &a.country),
        region: pick(from_zip, from_street, |a| &a.region),
        city: pick(from_zip, from_street, |a| &a.city),
        postcode: pick(from_zip, from_street, |a| &a.postcode),
        road: pick(from_street, from_zip, |a| &a.road),
        house_number: pick(from_zip, from_street, |a| &a.house_number),
    };

    if merged.is_empty() {
        None
    } else {
        Some(merged)
    }
}

/// Takes `field` from `preferred`, falling back to `fallback`
fn pick(
    preferred: Option<&Address>,
    fallback: Option<&Address>,
    field: fn(&Address) -> &Option<String>,
) -> Option<String> {
    preferred
        .and_then(|a| field(a).clone())
        .or_else(|| fallback.and_then(|a| field(a).clone()))
}
