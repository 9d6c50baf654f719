pub mod auth;
pub mod dashboard;
pub mod lights;
pub mod map;
pub mod notifications;
pub mod reports;
