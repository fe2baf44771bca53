pub mod forward;
pub mod frontend;
