pub mod category;
pub mod errors;
pub mod heading;
pub mod linker;
pub mod locale;
pub mod public_body;
pub mod tag_guard;
pub mod translation;
pub mod types;
