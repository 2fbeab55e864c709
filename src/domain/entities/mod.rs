pub mod analytics;
pub mod contact;
pub mod project;
pub mod setting;
