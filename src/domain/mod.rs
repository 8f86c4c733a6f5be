mod caller;
mod profile;
mod status;

pub use caller::Caller;
pub use profile::{Profile, ProfileDetails, RoleFieldsPatch};
pub use status::{ProfileRef, StatusRecord};
