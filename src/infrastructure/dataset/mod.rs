//! Dataset sources

mod jsonl;

pub use jsonl::JsonlDataset;
