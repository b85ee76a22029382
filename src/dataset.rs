pub mod common_structs;

pub mod data_transformers;
pub mod filter_job;
pub mod image_files;
pub mod splits;
