pub mod confirmation;
pub mod dispatch;
pub mod merge;
pub mod models;
pub mod pricing;
pub mod steps;
pub mod transition;

pub use confirmation::{requires_confirmation, ConfirmationKind};
pub use dispatch::{EffectDispatcher, EffectFailed};
pub use merge::merge_steps;
pub use models::{Order, PriceLine, PricingOverride, ProcessingStep, StepStatus};
pub use steps::{generate_steps, regenerate_steps, StepId};
pub use transition::{
    acknowledge_effect, apply_pending, transition, Effect, TransitionContext, TransitionError,
    TransitionOutcome, TransitionResult,
};
