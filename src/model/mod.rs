pub mod errors;
pub mod expr;
pub mod slots;
pub mod stmt;
pub mod substitute;
pub mod types;
