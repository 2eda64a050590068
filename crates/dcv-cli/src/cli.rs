use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dcv",
    about = "DICOM vault: content-addressed storage, attribute lookup and PNG conversion",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Storage directory [default: storage]
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Store a DICOM file and print its file ID
    Upload(UploadArgs),
    /// Print one attribute of a stored file
    Attribute(AttributeArgs),
    /// Render a stored file as a PNG image
    Convert(ConvertArgs),
    /// Start the HTTP server
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct UploadArgs {
    #[arg(short, long)]
    pub file: PathBuf,
}

#[derive(Args)]
pub struct AttributeArgs {
    /// File ID returned by `upload`
    #[arg(short, long)]
    pub id: String,
    /// Tag as GGGG,EEEE, e.g. 0010,0010
    #[arg(short, long)]
    pub tag: String,
}

#[derive(Args)]
pub struct ConvertArgs {
    #[arg(short, long)]
    pub id: String,
    /// Output path [default: <ID>.png]
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Accept this token with the admin role
    #[arg(long)]
    pub admin_token: Option<String>,
}
