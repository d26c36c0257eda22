#[tokio::main]
async fn main() {
    if let Err(e) = rollup_compression_research::cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
