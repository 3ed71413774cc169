pub mod memo;
pub mod validate;
