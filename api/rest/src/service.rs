pub mod project;
pub mod root;
pub mod upload;
