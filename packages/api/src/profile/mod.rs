//! Profile provisioning and distribution.

mod context;
mod provision;

pub use context::{ProfileContext, ProfileFeed, ProfileState};
pub use provision::{new_profile_for, Provisioner, ProvisionOutcome};
