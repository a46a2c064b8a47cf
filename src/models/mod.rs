// src/models/mod.rs
pub mod generic;
pub mod gbm;
pub mod heston;
pub mod ito_process;
pub mod ou_process;
