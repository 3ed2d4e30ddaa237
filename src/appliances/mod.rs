//! Appliance models for socket panel simulation.

/// Appliance identity, draw formulas, and toggle primitives.
pub mod appliance;
/// Kind tags and the kind-policy set.
pub mod kind;

// Re-export the main types for convenience
pub use appliance::Appliance;
pub use appliance::ApplianceError;
pub use appliance::DrawModel;
pub use appliance::TV_STANDBY_KW;
pub use kind::ApplianceKind;
pub use kind::KindSet;
