use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vidsleuth")]
#[command(
    author,
    version,
    about = "Scan a directory tree and report codec, HDR and audio features of every video"
)]
pub struct Cli {
    /// Directory to scan
    #[arg(required = true)]
    pub root: PathBuf,

    /// Number of concurrent probes (default: twice the CPU count)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Seconds before a single probe is abandoned
    #[arg(long, default_value = "60")]
    pub timeout_secs: u64,

    /// Maximum directory depth to descend
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Probe binary to use instead of `ffprobe` on PATH
    #[arg(long)]
    pub ffprobe: Option<PathBuf>,

    /// Recognised extension, repeatable (default: mp4 mkv avi mov webm)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Only show files whose name contains this text (case-insensitive)
    #[arg(short, long, default_value = "")]
    pub filter: String,

    /// Sort by column label, e.g. Size, Resolution, HEVC
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Also write the report as CSV
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Also write the report as JSON
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Use ASCII marks (Y/-) in the table
    #[arg(long)]
    pub ascii: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
