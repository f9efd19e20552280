use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = urlshort::cli::Cli::parse();
    if let Err(e) = urlshort::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
