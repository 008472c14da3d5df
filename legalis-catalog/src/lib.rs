pub mod countries;
pub mod returns;
pub mod services;

pub use countries::{resolve_country, Country};
pub use returns::ReturnService;
pub use services::{AuthorityKind, ServiceKind, AUTHORITY_ORDER};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Unknown service identifier: {0}")]
    UnknownService(String),

    #[error("Unknown return service: {0}")]
    UnknownReturnService(String),
}
