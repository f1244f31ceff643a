pub mod gate;
pub mod types;

pub use gate::DecisionGate;
pub use types::{
    Decision, HookOutput, PermissionDecision, DEFAULT_ANNOTATE_FEEDBACK, DEFAULT_DENY_FEEDBACK,
    INACTIVITY_FEEDBACK,
};
