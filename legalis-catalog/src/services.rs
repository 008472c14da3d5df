use crate::CatalogError;
use serde::{Deserialize, Serialize};

/// Selectable services on a legalization order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Notarization,
    Apostille,
    Chamber,
    Ministry,
    Embassy,
    Translation,
    Pickup,
    Scanning,
    Expedited,
    ReturnShipping,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Notarization => "notarization",
            ServiceKind::Apostille => "apostille",
            ServiceKind::Chamber => "chamber",
            ServiceKind::Ministry => "ministry",
            ServiceKind::Embassy => "embassy",
            ServiceKind::Translation => "translation",
            ServiceKind::Pickup => "pickup",
            ServiceKind::Scanning => "scanning",
            ServiceKind::Expedited => "expedited",
            ServiceKind::ReturnShipping => "return_shipping",
        }
    }

    /// Human-readable name for admin display
    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceKind::Notarization => "Notarization",
            ServiceKind::Apostille => "Apostille",
            ServiceKind::Chamber => "Chamber of Commerce",
            ServiceKind::Ministry => "Ministry for Foreign Affairs",
            ServiceKind::Embassy => "Embassy legalization",
            ServiceKind::Translation => "Authorized translation",
            ServiceKind::Pickup => "Document pickup",
            ServiceKind::Scanning => "Scanned copies",
            ServiceKind::Expedited => "Expedited processing",
            ServiceKind::ReturnShipping => "Return shipping",
        }
    }

    /// The authority this service submits documents to, if any
    pub fn authority(&self) -> Option<AuthorityKind> {
        match self {
            ServiceKind::Notarization => Some(AuthorityKind::Notarization),
            ServiceKind::Apostille => Some(AuthorityKind::Apostille),
            ServiceKind::Chamber => Some(AuthorityKind::Chamber),
            ServiceKind::Ministry => Some(AuthorityKind::Ministry),
            ServiceKind::Embassy => Some(AuthorityKind::Embassy),
            ServiceKind::Translation => Some(AuthorityKind::Translation),
            _ => None,
        }
    }
}

impl std::str::FromStr for ServiceKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notarization" => Ok(ServiceKind::Notarization),
            "apostille" => Ok(ServiceKind::Apostille),
            "chamber" => Ok(ServiceKind::Chamber),
            "ministry" | "ud" => Ok(ServiceKind::Ministry),
            "embassy" => Ok(ServiceKind::Embassy),
            "translation" => Ok(ServiceKind::Translation),
            "pickup" => Ok(ServiceKind::Pickup),
            "scanning" | "scanned_copies" => Ok(ServiceKind::Scanning),
            "expedited" => Ok(ServiceKind::Expedited),
            "return_shipping" => Ok(ServiceKind::ReturnShipping),
            other => Err(CatalogError::UnknownService(other.to_string())),
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External legal authorities an order can pass through
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityKind {
    Notarization,
    Apostille,
    Chamber,
    Ministry,
    Embassy,
    Translation,
}

/// Fixed processing sequence for authority services. Documents always move
/// through authorities in this order regardless of how services were entered.
pub const AUTHORITY_ORDER: [AuthorityKind; 6] = [
    AuthorityKind::Notarization,
    AuthorityKind::Apostille,
    AuthorityKind::Chamber,
    AuthorityKind::Ministry,
    AuthorityKind::Embassy,
    AuthorityKind::Translation,
];

impl AuthorityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorityKind::Notarization => "notarization",
            AuthorityKind::Apostille => "apostille",
            AuthorityKind::Chamber => "chamber",
            AuthorityKind::Ministry => "ministry",
            AuthorityKind::Embassy => "embassy",
            AuthorityKind::Translation => "translation",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AuthorityKind::Notarization => "Notary Public",
            AuthorityKind::Apostille => "Apostille",
            AuthorityKind::Chamber => "Chamber of Commerce",
            AuthorityKind::Ministry => "Ministry for Foreign Affairs",
            AuthorityKind::Embassy => "Embassy",
            AuthorityKind::Translation => "Authorized translator",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_authority_order_covers_all_authority_services() {
        for service in [
            ServiceKind::Notarization,
            ServiceKind::Apostille,
            ServiceKind::Chamber,
            ServiceKind::Ministry,
            ServiceKind::Embassy,
            ServiceKind::Translation,
        ] {
            let authority = service.authority().unwrap();
            assert!(AUTHORITY_ORDER.contains(&authority));
        }
    }

    #[test]
    fn test_service_id_round_trip() {
        for id in ["notarization", "embassy", "return_shipping", "pickup"] {
            let service = ServiceKind::from_str(id).unwrap();
            assert_eq!(service.as_str(), id);
        }
    }

    #[test]
    fn test_legacy_service_aliases() {
        assert_eq!(ServiceKind::from_str("ud").unwrap(), ServiceKind::Ministry);
        assert_eq!(
            ServiceKind::from_str("scanned_copies").unwrap(),
            ServiceKind::Scanning
        );
    }

    #[test]
    fn test_unknown_service_rejected() {
        assert!(ServiceKind::from_str("teleportation").is_err());
    }
}
