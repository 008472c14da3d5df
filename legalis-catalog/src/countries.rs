use serde::Serialize;

/// Destination country metadata for embassy legalization
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code
    pub code: &'static str,
    pub name: &'static str,
    /// Where the embassy handling Swedish documents sits, when there is one
    pub embassy_city: Option<&'static str>,
}

// Destinations that regularly show up on legalization orders. Orders may
// still carry free-text country values; those simply resolve to None.
const COUNTRIES: &[Country] = &[
    Country { code: "AE", name: "United Arab Emirates", embassy_city: Some("Stockholm") },
    Country { code: "AO", name: "Angola", embassy_city: Some("Stockholm") },
    Country { code: "BR", name: "Brazil", embassy_city: Some("Stockholm") },
    Country { code: "CN", name: "China", embassy_city: Some("Stockholm") },
    Country { code: "DZ", name: "Algeria", embassy_city: Some("Stockholm") },
    Country { code: "EG", name: "Egypt", embassy_city: Some("Stockholm") },
    Country { code: "ET", name: "Ethiopia", embassy_city: Some("Stockholm") },
    Country { code: "ID", name: "Indonesia", embassy_city: Some("Stockholm") },
    Country { code: "IN", name: "India", embassy_city: Some("Stockholm") },
    Country { code: "IQ", name: "Iraq", embassy_city: Some("Stockholm") },
    Country { code: "IR", name: "Iran", embassy_city: Some("Stockholm") },
    Country { code: "JO", name: "Jordan", embassy_city: Some("Oslo") },
    Country { code: "KW", name: "Kuwait", embassy_city: Some("Stockholm") },
    Country { code: "LB", name: "Lebanon", embassy_city: Some("Stockholm") },
    Country { code: "LY", name: "Libya", embassy_city: Some("Stockholm") },
    Country { code: "MA", name: "Morocco", embassy_city: Some("Stockholm") },
    Country { code: "NG", name: "Nigeria", embassy_city: Some("Stockholm") },
    Country { code: "PK", name: "Pakistan", embassy_city: Some("Stockholm") },
    Country { code: "QA", name: "Qatar", embassy_city: Some("Stockholm") },
    Country { code: "SA", name: "Saudi Arabia", embassy_city: Some("Stockholm") },
    Country { code: "TH", name: "Thailand", embassy_city: Some("Stockholm") },
    Country { code: "TN", name: "Tunisia", embassy_city: Some("Stockholm") },
    Country { code: "TR", name: "Turkey", embassy_city: Some("Stockholm") },
    Country { code: "TW", name: "Taiwan", embassy_city: Some("Stockholm") },
    Country { code: "VN", name: "Vietnam", embassy_city: Some("Stockholm") },
];

/// Resolve a stored country value to catalog metadata.
///
/// Orders store either an ISO code or a free-text name, so both are accepted,
/// case-insensitively.
pub fn resolve_country(value: &str) -> Option<&'static Country> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    COUNTRIES.iter().find(|c| {
        c.code.eq_ignore_ascii_case(trimmed) || c.name.eq_ignore_ascii_case(trimmed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_code_and_name() {
        assert_eq!(resolve_country("AE").unwrap().name, "United Arab Emirates");
        assert_eq!(resolve_country("saudi arabia").unwrap().code, "SA");
    }

    #[test]
    fn test_free_text_resolves_to_none() {
        assert!(resolve_country("Somewhere Else").is_none());
        assert!(resolve_country("").is_none());
    }
}
