pub mod analyzer;
pub mod browser;
pub mod cli;
pub mod error;
pub mod login;
pub mod report;
pub mod synth;
pub mod trace;
