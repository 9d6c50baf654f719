pub mod auth;
pub mod filesystem;
pub mod light;
pub mod listing;
pub mod map;
pub mod notification;
pub mod report;
