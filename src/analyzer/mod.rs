pub mod analyzer;
pub mod levels;
pub mod model;
pub mod rules;
