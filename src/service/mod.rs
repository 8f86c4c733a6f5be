pub mod accounts;
pub mod catalog;
pub mod config;
pub mod profiles;
pub mod provisioning;
pub mod relationships;
pub mod statuses;
