pub mod document;
pub mod signing;
