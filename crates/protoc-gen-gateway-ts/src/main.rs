//! protoc-gen-gateway-ts
//!
//! Plugin mode (no arguments): `CodeGeneratorRequest` on stdin,
//! `CodeGeneratorResponse` on stdout. Diagnostics go to stderr.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gateway_ts_core::FsProbe;
use gateway_ts_render::TypeScriptRenderer;
use protoc_gen_gateway_ts::{dump_ir, encode_response, generate, PluginRequest};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "protoc-gen-gateway-ts")]
#[command(
    version,
    about = "protoc plugin generating TypeScript clients for grpc-gateway services"
)]
struct Cli {
    /// Read the encoded CodeGeneratorRequest from FILE instead of stdin
    #[arg(long, value_name = "FILE")]
    request: Option<PathBuf>,

    /// Print the analysed files as JSON instead of writing a response
    #[arg(long)]
    dump_ir: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let input = match &cli.request {
        Some(path) => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
        }
        None => {
            let mut input = Vec::new();
            io::stdin()
                .read_to_end(&mut input)
                .context("failed to read request from stdin")?;
            input
        }
    };

    let request = PluginRequest::decode(&input)?;
    init_tracing(request.log_level());

    if cli.dump_ir {
        println!("{}", dump_ir(&request)?);
        return Ok(());
    }

    let response = generate(&request, TypeScriptRenderer::new(), FsProbe::new());
    io::stdout()
        .write_all(&encode_response(&response))
        .context("failed to write response to stdout")?;
    Ok(())
}

/// `RUST_LOG` wins over the `loglevel` plugin parameter.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}
