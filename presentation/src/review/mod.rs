//! Interactive decisions on stored notes

pub mod resolver;

pub use resolver::InteractiveDuplicateResolver;
