use anyhow::Result;
use std::path::PathBuf;

use data_processor::ProcessorServer;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Get the data path from the command line or use the current directory.
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    // Create and run the server.
    let mut server = ProcessorServer::with_path(path);
    server.run().await?;

    Ok(())
}
