// src/mc/mod.rs
pub mod config;
pub mod path_batch;
