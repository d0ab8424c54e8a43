mod handlers;
mod stdio;

pub use stdio::ProcessorServer;
