use serde::Serialize;

/// Structured address fields
///
/// Used both for the payload of a geocoding result and for the reconciled
/// address of a domain. Every field may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Address {
    pub country: Option<String>,
    /// State, province, or other first-level subdivision
    pub region: Option<String>,
    pub city: Option<String>,
    pub postcode: Option<String>,
    pub road: Option<String>,
    pub house_number: Option<String>,
}

impl Address {
    /// Returns true when no field carries a value
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, value)| value.is_none())
    }

    /// Field names and values in output column order
    pub fn fields(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("country", self.country.as_deref()),
            ("region", self.region.as_deref()),
            ("city", self.city.as_deref()),
            ("postcode", self.postcode.as_deref()),
            ("road", self.road.as_deref()),
            ("house_number", self.house_number.as_deref()),
        ]
    }
}

/// The final output for one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressRecord {
    /// The input domain
    pub domain: String,

    /// URL of the page the address was found on
    pub source_url: String,

    pub address: Address,
}

/// Raw address candidates found on one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedCandidates {
    /// Street-address-shaped text, e.g. `123 Main Street`
    pub street: Option<String>,

    /// ZIP or ZIP+4 code, e.g. `62704`
    pub postal_code: Option<String>,
}
