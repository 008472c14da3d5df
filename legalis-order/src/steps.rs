use crate::models::{Order, ProcessingStep};
use legalis_catalog::{AuthorityKind, ReturnService, AUTHORITY_ORDER};
use serde::{Deserialize, Serialize};

use crate::models::DocumentSource;

/// The two halves of an authority interaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    Delivery,
    Pickup,
}

/// Cover letter documents the office prints ahead of an authority visit.
/// Notarization and apostille share one letter; chamber and translation
/// have none.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CoverLetterKind {
    NotaryApostille,
    Ministry,
    Embassy,
}

/// Closed vocabulary of processing step identifiers.
///
/// Serialized as the stable snake_case strings stored on orders
/// (`embassy_delivery`, `print_packing_slip`, ...). The `LegacyAuthority`
/// variants parse the old single-leg identifiers so checklists written by
/// earlier versions still merge cleanly; the generator never emits them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(into = "String", try_from = "String")]
pub enum StepId {
    OrderVerification,
    PickupBooking,
    DocumentReceipt,
    EmailDocumentsReceived,
    FileUploadVerification,
    QualityControl,
    EmbassyPriceConfirmation,
    CopyOfDocumentEmbassy,
    PrintCoverLetter(CoverLetterKind),
    EmbassyPayment,
    Authority { authority: AuthorityKind, leg: Leg },
    LegacyAuthority(AuthorityKind),
    Scanning,
    PrintPackingSlip,
    FinalCheck,
    PrintCustomerReturnLabel,
    AwaitReturnAddressConfirmation,
    PrepareReturn,
    ReturnShipping,
    Invoicing,
}

impl StepId {
    pub fn as_str(&self) -> &'static str {
        use AuthorityKind::*;
        match self {
            StepId::OrderVerification => "order_verification",
            StepId::PickupBooking => "pickup_booking",
            StepId::DocumentReceipt => "document_receipt",
            StepId::EmailDocumentsReceived => "email_documents_received",
            StepId::FileUploadVerification => "file_upload_verification",
            StepId::QualityControl => "quality_control",
            StepId::EmbassyPriceConfirmation => "embassy_price_confirmation",
            StepId::CopyOfDocumentEmbassy => "copy_of_document_embassy",
            StepId::PrintCoverLetter(CoverLetterKind::NotaryApostille) => {
                "print_notary_apostille_cover_letter"
            }
            StepId::PrintCoverLetter(CoverLetterKind::Ministry) => "print_ministry_cover_letter",
            StepId::PrintCoverLetter(CoverLetterKind::Embassy) => "print_embassy_cover_letter",
            StepId::EmbassyPayment => "embassy_payment",
            StepId::Authority { authority, leg: Leg::Delivery } => match authority {
                Notarization => "notarization_delivery",
                Apostille => "apostille_delivery",
                Chamber => "chamber_delivery",
                Ministry => "ministry_delivery",
                Embassy => "embassy_delivery",
                Translation => "translation_delivery",
            },
            StepId::Authority { authority, leg: Leg::Pickup } => match authority {
                Notarization => "notarization_pickup",
                Apostille => "apostille_pickup",
                Chamber => "chamber_pickup",
                Ministry => "ministry_pickup",
                Embassy => "embassy_pickup",
                Translation => "translation_pickup",
            },
            StepId::LegacyAuthority(authority) => match authority {
                Notarization => "notarization",
                Apostille => "apostille",
                Chamber => "chamber_processing",
                Ministry => "ud_processing",
                Embassy => "embassy_processing",
                Translation => "translation",
            },
            StepId::Scanning => "scanning",
            StepId::PrintPackingSlip => "print_packing_slip",
            StepId::FinalCheck => "final_check",
            StepId::PrintCustomerReturnLabel => "print_customer_return_label",
            StepId::AwaitReturnAddressConfirmation => "await_return_address_confirmation",
            StepId::PrepareReturn => "prepare_return",
            StepId::ReturnShipping => "return_shipping",
            StepId::Invoicing => "invoicing",
        }
    }

    pub fn display_name(&self) -> &'static str {
        use AuthorityKind::*;
        match self {
            StepId::OrderVerification => "Order verification",
            StepId::PickupBooking => "Book document pickup",
            StepId::DocumentReceipt => "Documents received",
            StepId::EmailDocumentsReceived => "Emailed documents received",
            StepId::FileUploadVerification => "Verify uploaded files",
            StepId::QualityControl => "Quality control",
            StepId::EmbassyPriceConfirmation => "Embassy price confirmation",
            StepId::CopyOfDocumentEmbassy => "Copy of document for embassy",
            StepId::PrintCoverLetter(CoverLetterKind::NotaryApostille) => {
                "Print notary/apostille cover letter"
            }
            StepId::PrintCoverLetter(CoverLetterKind::Ministry) => "Print ministry cover letter",
            StepId::PrintCoverLetter(CoverLetterKind::Embassy) => "Print embassy cover letter",
            StepId::EmbassyPayment => "Embassy payment",
            StepId::Authority { authority, leg: Leg::Delivery } => match authority {
                Notarization => "Submit to notary",
                Apostille => "Submit for apostille",
                Chamber => "Submit to Chamber of Commerce",
                Ministry => "Submit to Ministry for Foreign Affairs",
                Embassy => "Submit to embassy",
                Translation => "Submit to translator",
            },
            StepId::Authority { authority, leg: Leg::Pickup } => match authority {
                Notarization => "Collect from notary",
                Apostille => "Collect apostille",
                Chamber => "Collect from Chamber of Commerce",
                Ministry => "Collect from Ministry for Foreign Affairs",
                Embassy => "Collect from embassy",
                Translation => "Collect translation",
            },
            StepId::LegacyAuthority(authority) => authority.display_name(),
            StepId::Scanning => "Scanned copies",
            StepId::PrintPackingSlip => "Print packing slip",
            StepId::FinalCheck => "Final check",
            StepId::PrintCustomerReturnLabel => "Print customer return label",
            StepId::AwaitReturnAddressConfirmation => "Await return address confirmation",
            StepId::PrepareReturn => "Prepare return",
            StepId::ReturnShipping => "Return shipping",
            StepId::Invoicing => "Invoicing",
        }
    }

    /// Authority steps carry submission/completion dates and are subject to
    /// the date gate before leaving `pending`.
    pub fn authority_leg(&self) -> Option<(AuthorityKind, Option<Leg>)> {
        match self {
            StepId::Authority { authority, leg } => Some((*authority, Some(*leg))),
            StepId::LegacyAuthority(authority) => Some((*authority, None)),
            _ => None,
        }
    }

    /// Step where the office takes possession of the customer's documents
    pub fn is_document_intake(&self) -> bool {
        matches!(
            self,
            StepId::DocumentReceipt | StepId::EmailDocumentsReceived | StepId::FileUploadVerification
        )
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<StepId> for String {
    fn from(id: StepId) -> Self {
        id.as_str().to_string()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown step identifier: {0}")]
pub struct UnknownStepId(String);

impl std::str::FromStr for StepId {
    type Err = UnknownStepId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use AuthorityKind::*;
        let id = match s {
            "order_verification" => StepId::OrderVerification,
            "pickup_booking" => StepId::PickupBooking,
            "document_receipt" => StepId::DocumentReceipt,
            "email_documents_received" => StepId::EmailDocumentsReceived,
            "file_upload_verification" => StepId::FileUploadVerification,
            "quality_control" => StepId::QualityControl,
            "embassy_price_confirmation" => StepId::EmbassyPriceConfirmation,
            "copy_of_document_embassy" => StepId::CopyOfDocumentEmbassy,
            "print_notary_apostille_cover_letter" => {
                StepId::PrintCoverLetter(CoverLetterKind::NotaryApostille)
            }
            "print_ministry_cover_letter" => StepId::PrintCoverLetter(CoverLetterKind::Ministry),
            "print_embassy_cover_letter" => StepId::PrintCoverLetter(CoverLetterKind::Embassy),
            "embassy_payment" => StepId::EmbassyPayment,
            "scanning" => StepId::Scanning,
            "print_packing_slip" => StepId::PrintPackingSlip,
            "final_check" => StepId::FinalCheck,
            "print_customer_return_label" => StepId::PrintCustomerReturnLabel,
            "await_return_address_confirmation" => StepId::AwaitReturnAddressConfirmation,
            "prepare_return" => StepId::PrepareReturn,
            "return_shipping" => StepId::ReturnShipping,
            "invoicing" => StepId::Invoicing,
            // Legacy single-leg authority steps from older checklists
            "notarization" => StepId::LegacyAuthority(Notarization),
            "apostille" => StepId::LegacyAuthority(Apostille),
            "chamber_processing" => StepId::LegacyAuthority(Chamber),
            "ud_processing" => StepId::LegacyAuthority(Ministry),
            "embassy_processing" => StepId::LegacyAuthority(Embassy),
            "translation" => StepId::LegacyAuthority(Translation),
            other => {
                if let Some(stem) = other.strip_suffix("_delivery") {
                    let authority = authority_from_stem(stem)
                        .ok_or_else(|| UnknownStepId(other.to_string()))?;
                    StepId::Authority { authority, leg: Leg::Delivery }
                } else if let Some(stem) = other.strip_suffix("_pickup") {
                    let authority = authority_from_stem(stem)
                        .ok_or_else(|| UnknownStepId(other.to_string()))?;
                    StepId::Authority { authority, leg: Leg::Pickup }
                } else {
                    return Err(UnknownStepId(other.to_string()));
                }
            }
        };
        Ok(id)
    }
}

impl TryFrom<String> for StepId {
    type Error = UnknownStepId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

fn authority_from_stem(stem: &str) -> Option<AuthorityKind> {
    match stem {
        "notarization" => Some(AuthorityKind::Notarization),
        "apostille" => Some(AuthorityKind::Apostille),
        "chamber" => Some(AuthorityKind::Chamber),
        "ministry" => Some(AuthorityKind::Ministry),
        "embassy" => Some(AuthorityKind::Embassy),
        "translation" => Some(AuthorityKind::Translation),
        _ => None,
    }
}

fn cover_letter_for(authority: AuthorityKind) -> Option<CoverLetterKind> {
    match authority {
        AuthorityKind::Notarization | AuthorityKind::Apostille => {
            Some(CoverLetterKind::NotaryApostille)
        }
        AuthorityKind::Ministry => Some(CoverLetterKind::Ministry),
        AuthorityKind::Embassy => Some(CoverLetterKind::Embassy),
        AuthorityKind::Chamber | AuthorityKind::Translation => None,
    }
}

/// Derive the processing checklist for an order from its selected services.
///
/// Pure and deterministic: the same order always yields the same ids in the
/// same sequence. The template is fixed in code rather than configurable so
/// the checklist stays predictable for staff and merging after service
/// edits stays tractable.
pub fn generate_steps(order: &Order) -> Vec<ProcessingStep> {
    let mut steps = Vec::new();

    steps.push(ProcessingStep::new(StepId::OrderVerification));

    if order.pickup_service {
        steps.push(ProcessingStep::new(StepId::PickupBooking));
    }

    // Document intake, one step depending on how documents arrive
    if order.document_source == DocumentSource::Original {
        steps.push(ProcessingStep::new(StepId::DocumentReceipt));
    } else if order.will_send_main_docs_later {
        steps.push(ProcessingStep::new(StepId::EmailDocumentsReceived));
    } else if order.files_uploaded {
        steps.push(ProcessingStep::completed_on_creation(StepId::FileUploadVerification));
    } else {
        steps.push(ProcessingStep::new(StepId::FileUploadVerification));
    }

    steps.push(ProcessingStep::new(StepId::QualityControl));

    let mut notary_apostille_letter_emitted = false;
    for authority in AUTHORITY_ORDER {
        let selected = order
            .services
            .iter()
            .any(|s| s.authority() == Some(authority));
        if !selected {
            continue;
        }

        if authority == AuthorityKind::Embassy {
            if order.has_unconfirmed_prices {
                steps.push(ProcessingStep::new(StepId::EmbassyPriceConfirmation));
            }
            steps.push(ProcessingStep::new(StepId::CopyOfDocumentEmbassy));
        }

        match cover_letter_for(authority) {
            Some(CoverLetterKind::NotaryApostille) => {
                if !notary_apostille_letter_emitted {
                    steps.push(ProcessingStep::new(StepId::PrintCoverLetter(
                        CoverLetterKind::NotaryApostille,
                    )));
                    notary_apostille_letter_emitted = true;
                }
            }
            Some(kind) => steps.push(ProcessingStep::new(StepId::PrintCoverLetter(kind))),
            None => {}
        }

        if authority == AuthorityKind::Embassy {
            steps.push(ProcessingStep::new(StepId::EmbassyPayment));
        }

        steps.push(ProcessingStep::new(StepId::Authority { authority, leg: Leg::Delivery }));
        steps.push(ProcessingStep::new(StepId::Authority { authority, leg: Leg::Pickup }));
    }

    if order.scanned_copies {
        steps.push(ProcessingStep::new(StepId::Scanning));
    }

    steps.push(ProcessingStep::new(StepId::PrintPackingSlip));
    steps.push(ProcessingStep::new(StepId::FinalCheck));

    if order.return_service == Some(ReturnService::OwnDelivery) && order.has_return_label {
        steps.push(ProcessingStep::new(StepId::PrintCustomerReturnLabel));
    }

    if order.confirm_return_address_later {
        if order.return_address_confirmed {
            steps.push(ProcessingStep::completed_on_creation(
                StepId::AwaitReturnAddressConfirmation,
            ));
        } else {
            steps.push(ProcessingStep::new(StepId::AwaitReturnAddressConfirmation));
        }
    }

    steps.push(ProcessingStep::new(StepId::PrepareReturn));
    steps.push(ProcessingStep::new(StepId::ReturnShipping));
    steps.push(ProcessingStep::new(StepId::Invoicing));

    tracing::debug!(
        order = %order.order_number,
        step_count = steps.len(),
        "generated processing step template"
    );

    steps
}

/// Regenerate the template and merge existing progress into it. This is
/// what runs after any service edit on an order.
pub fn regenerate_steps(order: &Order) -> Vec<ProcessingStep> {
    crate::merge::merge_steps(&order.processing_steps, generate_steps(order))
}
