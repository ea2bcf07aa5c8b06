//! sse-hub server binary
//!
//! Run with: sse-hub [STREAM_ADDR] [INGEST_ADDR] [--static-dir DIR]
//!
//! Examples:
//!   sse-hub                                  # 0.0.0.0:8000 and 0.0.0.0:8001
//!   sse-hub localhost                        # 127.0.0.1:8000 and 0.0.0.0:8001
//!   sse-hub 127.0.0.1:9000 127.0.0.1:9001
//!   sse-hub --static-dir ./static
//!
//! ## Consuming
//!
//!   open http://localhost:8000/
//!   curl -N http://localhost:8000/events/
//!
//! ## Publishing
//!
//!   curl -X POST --data 'hello' http://localhost:8001/

use std::net::SocketAddr;
use std::path::PathBuf;

use sse_hub::{HubServer, ServerConfig};

const STREAM_PORT: u16 = 8000;
const INGEST_PORT: u16 = 8001;

#[derive(Debug, Default)]
struct Args {
    stream_addr: Option<SocketAddr>,
    ingest_addr: Option<SocketAddr>,
    static_dir: Option<PathBuf>,
}

/// Parse bind address from command line argument.
///
/// Accepts formats:
/// - "localhost" -> 127.0.0.1:DEFAULT_PORT
/// - "localhost:9000" -> 127.0.0.1:9000
/// - "127.0.0.1" -> 127.0.0.1:DEFAULT_PORT
/// - "0.0.0.0:9000" -> 0.0.0.0:9000
fn parse_bind_addr(arg: &str, default_port: u16) -> Result<SocketAddr, String> {
    let normalized = arg.replace("localhost", "127.0.0.1");

    if let Ok(addr) = normalized.parse::<SocketAddr>() {
        return Ok(addr);
    }

    if let Ok(ip) = normalized.parse::<std::net::IpAddr>() {
        return Ok(SocketAddr::new(ip, default_port));
    }

    Err(format!(
        "Invalid bind address: '{}'. Expected format: IP:PORT or IP or 'localhost'",
        arg
    ))
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut positional = 0;
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--static-dir" => {
                let dir = iter
                    .next()
                    .ok_or_else(|| "--static-dir requires a directory".to_string())?;
                parsed.static_dir = Some(PathBuf::from(dir));
            }
            _ => {
                match positional {
                    0 => parsed.stream_addr = Some(parse_bind_addr(arg, STREAM_PORT)?),
                    1 => parsed.ingest_addr = Some(parse_bind_addr(arg, INGEST_PORT)?),
                    _ => return Err(format!("Unexpected argument: '{}'", arg)),
                }
                positional += 1;
            }
        }
    }

    Ok(parsed)
}

fn print_usage() {
    eprintln!("Usage: sse-hub [STREAM_ADDR] [INGEST_ADDR] [--static-dir DIR]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  STREAM_ADDR        Page and event stream listener (default: 0.0.0.0:8000)");
    eprintln!("  INGEST_ADDR        Publish listener (default: 0.0.0.0:8001)");
    eprintln!("  --static-dir DIR   Serve DIR under /static");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }

    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sse_hub=debug".parse()?),
        )
        .init();

    let mut config = ServerConfig::default();
    if let Some(addr) = args.stream_addr {
        config = config.stream_addr(addr);
    }
    if let Some(addr) = args.ingest_addr {
        config = config.ingest_addr(addr);
    }
    if let Some(dir) = args.static_dir {
        config = config.static_dir(dir);
    }

    let server = HubServer::new(config);

    server
        .run_until(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_bind_addr() {
        assert_eq!(
            parse_bind_addr("localhost", 8000).unwrap(),
            "127.0.0.1:8000".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            parse_bind_addr("0.0.0.0:9000", 8000).unwrap(),
            "0.0.0.0:9000".parse::<SocketAddr>().unwrap()
        );
        assert!(parse_bind_addr("not-an-addr", 8000).is_err());
    }

    #[test]
    fn test_parse_args_positional_and_flag() {
        let parsed = parse_args(&args(&["localhost", "127.0.0.1", "--static-dir", "web"])).unwrap();

        assert_eq!(parsed.stream_addr.unwrap().port(), STREAM_PORT);
        assert_eq!(parsed.ingest_addr.unwrap().port(), INGEST_PORT);
        assert_eq!(parsed.static_dir, Some(PathBuf::from("web")));
    }

    #[test]
    fn test_parse_args_rejects_extra() {
        assert!(parse_args(&args(&["127.0.0.1:1", "127.0.0.1:2", "127.0.0.1:3"])).is_err());
        assert!(parse_args(&args(&["--static-dir"])).is_err());
    }
}
