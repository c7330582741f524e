pub mod api;
pub mod combiner;
pub mod config;
pub mod data_models;
pub mod db;
pub mod domain_filter;
pub mod error;
pub mod pipeline;
pub mod probe;
pub mod scheduler;
pub mod tracking;
pub mod upstream;
