use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use dcv_server::{DicomServer, Role, ServerConfig, TokenConfig};
use dcv_service::FsDicomService;
use serde_json::json;

use crate::cli::*;

const DEFAULT_STORAGE: &str = "storage";

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let stdout = io::stdout();
    execute(cli, &mut stdout.lock())
}

/// Run `cli`, writing user-facing output to `out`.
pub fn execute(cli: Cli, out: &mut impl Write) -> anyhow::Result<()> {
    let storage = cli.storage.clone();
    let format = cli.format.clone();
    match cli.command {
        Command::Upload(args) => cmd_upload(&open(storage)?, args, &format, out),
        Command::Attribute(args) => cmd_attribute(&open(storage)?, args, &format, out),
        Command::Convert(args) => cmd_convert(&open(storage)?, args, &format, out),
        Command::Serve(args) => cmd_serve(storage, args),
    }
}

fn open(storage: Option<PathBuf>) -> anyhow::Result<FsDicomService> {
    let root = storage.unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE));
    FsDicomService::open(&root, Default::default())
        .with_context(|| format!("cannot open storage at {}", root.display()))
}

fn cmd_upload(
    svc: &FsDicomService,
    args: UploadArgs,
    format: &OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let id = svc
        .ingest(&args.file)
        .with_context(|| format!("error uploading {}", args.file.display()))?;
    match format {
        OutputFormat::Text => writeln!(
            out,
            "{} Upload successful, file ID: {}",
            "✓".green().bold(),
            id.to_hex().yellow()
        )?,
        OutputFormat::Json => writeln!(out, "{}", json!({ "file_id": id.to_hex() }))?,
    }
    Ok(())
}

fn cmd_attribute(
    svc: &FsDicomService,
    args: AttributeArgs,
    format: &OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let value = svc
        .get_attribute(&args.id, &args.tag)
        .with_context(|| format!("error retrieving attribute {}", args.tag))?;
    match format {
        OutputFormat::Text => writeln!(out, "Attribute value: {}", value.bold())?,
        OutputFormat::Json => writeln!(
            out,
            "{}",
            json!({ "file_id": args.id, "tag": args.tag, "attribute": value })
        )?,
    }
    Ok(())
}

fn cmd_convert(
    svc: &FsDicomService,
    args: ConvertArgs,
    format: &OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let dest = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.png", args.id)));
    let path = svc
        .convert_to_path(&args.id, &dest)
        .with_context(|| format!("error converting {}", args.id))?;
    match format {
        OutputFormat::Text => writeln!(
            out,
            "{} Converted file saved to: {}",
            "✓".green().bold(),
            path.display().to_string().cyan()
        )?,
        OutputFormat::Json => writeln!(out, "{}", json!({ "path": path }))?,
    }
    Ok(())
}

fn serve_config(
    storage: Option<PathBuf>,
    args: ServeArgs,
) -> anyhow::Result<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };
    if let Some(storage) = storage {
        config.storage_root = storage;
    }
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(token) = args.admin_token {
        config.tokens.push(TokenConfig {
            token,
            name: "admin".into(),
            role: Role::Admin,
        });
    }
    Ok(config)
}

fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
    ServerConfig::load(path).with_context(|| format!("cannot load {}", path.display()))
}

fn cmd_serve(storage: Option<PathBuf>, args: ServeArgs) -> anyhow::Result<()> {
    let config = serve_config(storage, args)?;
    let server = DicomServer::new(config).context("cannot start server")?;
    eprintln!(
        "DICOM vault on {} (storage: {})",
        server.config().bind_addr.to_string().bold(),
        server.config().storage_root.display()
    );
    tokio::runtime::Runtime::new()?.block_on(server.serve())?;
    Ok(())
}
