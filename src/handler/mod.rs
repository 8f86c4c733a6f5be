pub mod accounts;
pub mod caller;
pub mod clubs;
pub mod error;
pub mod health;
pub mod leagues;
pub mod profiles;
pub mod relationships;
pub mod statuses;
