//! Reqsift Server CLI
//!
//! Starts the HTTP server for SRS uploads and requirement extraction.

use reqsift_server::{config::ServerConfig, init_tracing, start_server, ServerError};
use std::env;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let args: Vec<String> = env::args().collect();

    let config = if args.len() > 2 && args[1] == "--config" {
        ServerConfig::from_file(&args[2])?
    } else if args.len() > 1 && args[1] == "--help" {
        print_help();
        process::exit(0);
    } else {
        eprintln!("No config file specified, using defaults");
        eprintln!("Usage: reqsift-server --config <path-to-config.toml>");
        eprintln!();
        ServerConfig::default()
    };

    init_tracing();
    start_server(config).await?;

    Ok(())
}

fn print_help() {
    println!("Reqsift Server - SRS Requirement Extraction");
    println!();
    println!("USAGE:");
    println!("    reqsift-server --config <path-to-config.toml>");
    println!();
    println!("OPTIONS:");
    println!("    --config <file>    Load configuration from TOML file");
    println!("    --help             Print this help message");
    println!();
    println!("EXAMPLE:");
    println!("    HF_API_KEY=hf_... reqsift-server --config config/reqsift.toml");
    println!();
    println!("CONFIGURATION:");
    println!("    The TOML config file may contain:");
    println!("    - bind_address: IP address to bind (default: '127.0.0.1')");
    println!("    - bind_port: Port number (default: 8000)");
    println!("    - upload_dir: Where uploaded documents are saved (default: 'uploads')");
    println!("    - output_dir: Where result files are written (default: '.')");
    println!("    - max_upload_bytes: Request body limit (default: 25 MiB)");
    println!("    - [llm]: endpoint, model, api_key_env, timeout_secs, max_tokens,");
    println!("             temperature, json_mode");
    println!("    - [extractor]: max_chars, structured_output");
    println!();
    println!("ENVIRONMENT:");
    println!("    HF_API_KEY    API key for the inference endpoint (name set by llm.api_key_env)");
    println!("    RUST_LOG      Log filter (default: reqsift=info,tower_http=info)");
    println!();
}
