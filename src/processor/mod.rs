mod data;
mod file;

pub use data::Processor;
