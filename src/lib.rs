pub mod cleaner;
pub mod config;
pub mod enricher;
pub mod geo;
pub mod loader;
pub mod normalizer;
pub mod output;
pub mod pipeline;
pub mod record;
