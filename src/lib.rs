pub mod config;
pub mod error;
pub mod processor;
pub mod protocol;
pub mod server;
pub mod standalone;

pub use error::ProcessError;
pub use processor::Processor;
pub use server::ProcessorServer;
pub use standalone::standalone_function;
