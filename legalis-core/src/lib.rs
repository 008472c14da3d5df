pub mod carrier;
pub mod invoice;
pub mod notify;
pub mod store;

pub use carrier::{BookingRef, CarrierBooking, MockCarrierBooking};
pub use invoice::{Invoicer, MockInvoicer};
pub use notify::{MockNotifier, Notifier};
pub use store::{MockOrderStore, OrderStore};

/// Boxed error type shared by all collaborator traits
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;
