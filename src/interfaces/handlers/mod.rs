pub mod access;
pub mod admin;
pub mod analytics;
pub mod contact;
pub mod home;
pub mod migration;
pub mod projects;
pub mod settings;
pub mod system;
