pub mod config;
pub mod engine;
pub mod error;
pub mod fact;
pub mod ingest;
pub mod metric;
pub mod qualify;
pub mod rank;
pub mod record;
pub mod roster;
pub mod scope;
pub mod season;
