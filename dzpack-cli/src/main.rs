//! dzpack - batch deep-zoom tiling into compact tile containers.

mod batch;
mod display;
mod error;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use dzpack::config::TileFormat;
use dzpack::logging::{default_log_file, init_logging};
use dzpack::task::TaskLoader;
use tracing::info;

use batch::{resolve_config, run_batch, Overrides};
use error::CliError;

#[derive(Parser, Debug)]
#[command(name = "dzpack")]
#[command(version = dzpack::VERSION)]
#[command(about = "Generate deep-zoom tile pyramids and pack them into per-image containers")]
struct Args {
    /// File listing source images, one per line
    #[arg(long, value_name = "FILE")]
    inputs: PathBuf,

    /// File listing output folders, line-aligned with --inputs
    #[arg(long, value_name = "FILE")]
    outputs: PathBuf,

    /// Tile edge length in pixels [default: 512]
    #[arg(long, value_name = "PX", value_parser = clap::value_parser!(u32).range(1..))]
    tile_size: Option<u32>,

    /// Tile format: .png, .jpg or .jpeg [default: .jpg]
    #[arg(long, value_name = "EXT", value_parser = parse_suffix)]
    suffix: Option<TileFormat>,

    /// JPEG quality 1-100 [default: 85]
    #[arg(
        long,
        visible_alias = "jpeg-quality",
        value_name = "Q",
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    quality: Option<u8>,

    /// Number of images processed in parallel [default: hardware concurrency]
    #[arg(long, visible_alias = "workers", value_name = "N", value_parser = parse_workers)]
    threads: Option<usize>,

    /// Keep the per-tile files after merging them into the container
    #[arg(long)]
    keep_tiles: bool,

    /// Optional INI configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for the log file
    #[arg(long, value_name = "DIR", default_value = dzpack::logging::default_log_dir())]
    log_dir: PathBuf,

    /// Show debug output on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            config_file: self.config.clone(),
            tile_size: self.tile_size,
            format: self.suffix,
            quality: self.quality,
            workers: self.threads,
            keep_tiles: self.keep_tiles,
        }
    }
}

fn parse_suffix(s: &str) -> Result<TileFormat, String> {
    s.parse::<TileFormat>().map_err(|e| e.to_string())
}

fn parse_workers(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(format!("'{}' is not a positive integer", s)),
    }
}

fn main() {
    let args = Args::parse();

    let guard = init_logging(&args.log_dir, default_log_file(), args.verbose)
        .unwrap_or_else(|e| CliError::LoggingInit(e).exit());

    let config = resolve_config(&args.overrides()).unwrap_or_else(|e| e.exit());

    let tasks = TaskLoader::new(&args.inputs, &args.outputs)
        .load()
        .unwrap_or_else(|e| CliError::from(e).exit());

    if tasks.is_empty() {
        println!("No tasks to process.");
        return;
    }

    display::print_banner(&config, tasks.len());
    info!(
        tasks = tasks.len(),
        log = %guard.log_path().display(),
        "dzpack {} starting",
        dzpack::VERSION
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| CliError::Runtime(e).exit());

    let summary = runtime.block_on(run_batch(tasks, &config, !args.no_progress));
    display::print_summary(&summary);

    let code = summary.exit_code();
    drop(runtime);
    drop(guard);
    process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_required_lists() {
        assert!(Args::try_parse_from(["dzpack"]).is_err());
        assert!(Args::try_parse_from(["dzpack", "--inputs", "a.txt"]).is_err());
    }

    #[test]
    fn test_defaults_are_unset() {
        let args = Args::try_parse_from(["dzpack", "--inputs", "a", "--outputs", "b"]).unwrap();
        assert_eq!(args.tile_size, None);
        assert_eq!(args.suffix, None);
        assert!(!args.keep_tiles);
        assert_eq!(args.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn test_all_flags() {
        let args = Args::try_parse_from([
            "dzpack",
            "--inputs",
            "in.txt",
            "--outputs",
            "out.txt",
            "--tile-size",
            "256",
            "--suffix",
            ".png",
            "--jpeg-quality",
            "70",
            "--workers",
            "3",
            "--keep-tiles",
            "-v",
        ])
        .unwrap();

        let overrides = args.overrides();
        assert_eq!(overrides.tile_size, Some(256));
        assert_eq!(overrides.format, Some(TileFormat::Png));
        assert_eq!(overrides.quality, Some(70));
        assert_eq!(overrides.workers, Some(3));
        assert!(overrides.keep_tiles);
        assert!(args.verbose);
    }

    #[test]
    fn test_rejects_bad_values() {
        let base = ["dzpack", "--inputs", "a", "--outputs", "b"];
        let with = |extra: &[&str]| {
            let mut argv: Vec<&str> = base.to_vec();
            argv.extend_from_slice(extra);
            Args::try_parse_from(argv)
        };

        assert!(with(&["--suffix", ".tif"]).is_err());
        assert!(with(&["--quality", "0"]).is_err());
        assert!(with(&["--quality", "101"]).is_err());
        assert!(with(&["--threads", "0"]).is_err());
        assert!(with(&["--tile-size", "0"]).is_err());
    }
}
