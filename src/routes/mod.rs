pub mod categories;
pub mod main;
