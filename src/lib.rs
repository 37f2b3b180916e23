//! An in-memory object model for Java's type system and a slice of its
//! statement syntax, used to assemble source text programmatically instead
//! of by string concatenation.

pub mod formatter;
pub mod model;
