// Filter expression parser for the CLI

pub mod lexer;
pub mod predicate;

// Public API re-exports
pub use predicate::parse_predicates;
