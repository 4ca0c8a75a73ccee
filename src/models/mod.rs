pub mod category;
pub mod config;
pub mod heading;
pub mod link;
pub mod public_body;
pub mod translation;
