pub mod components;
pub mod rewrite;
pub mod start;
pub mod status;
