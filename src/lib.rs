pub mod cache;
pub mod cli;
pub mod config;
pub mod digest;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod report;
pub mod request;
pub mod scoring;
pub mod walker;
