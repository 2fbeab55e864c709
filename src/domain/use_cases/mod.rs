pub mod admin;
pub mod analytics;
pub mod contact;
pub mod extractors;
pub mod gate;
pub mod migration;
pub mod projects;
pub mod settings;
