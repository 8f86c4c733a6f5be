pub mod account_relationships;
pub mod accounts;
pub mod clubs;
pub mod leagues;
pub mod profile_statuses;
pub mod profiles;
