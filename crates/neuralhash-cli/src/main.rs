use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::bail;
use clap::Parser;
use log::LevelFilter;

use neuralhash_core::{compute_neural_hash, Error, OutputFormat};

#[derive(Parser)]
#[command(name = "neuralhash", version)]
#[command(about = "Compute NeuralHashes for images using the macOS Vision framework")]
#[command(after_help = "Example: neuralhash path/to/image.jpg --format hex\n\
                        Relies on private Apple APIs; may break with macOS updates.")]
struct Cli {
    /// Path(s) to the image file(s) to process
    #[arg(value_name = "PATH_TO_IMAGE", required = true)]
    image_paths: Vec<PathBuf>,

    /// Output format for the hash: hex, base64, or bits
    #[arg(short, long, default_value = "hex")]
    format: String,

    /// Enable verbose output (info-level logging)
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output (debug-level logging)
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Flags raise the default level; RUST_LOG still wins
    let level = if cli.debug {
        LevelFilter::Debug
    } else if cli.verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    // Reject a bad format string before any image is touched
    let format = OutputFormat::parse(&cli.format)?;

    if !neuralhash_core::is_available() {
        bail!(
            "the Objective-C runtime and the Foundation/Vision frameworks were not found; \
             this tool only functions on macOS"
        );
    }

    Ok(process_images(&cli.image_paths, format))
}

fn process_images(paths: &[PathBuf], format: OutputFormat) -> ExitCode {
    let total = paths.len();
    let mut exit_code = ExitCode::SUCCESS;

    for (i, path) in paths.iter().enumerate() {
        if let Err(message) = validate_image_path(path) {
            eprintln!("Error: {message}");
            exit_code = ExitCode::FAILURE;
            continue;
        }

        if total > 1 {
            println!(
                "--- Processing image {}/{}: {} ---",
                i + 1,
                total,
                path.display()
            );
        } else {
            println!("Processing image: {}", path.display());
        }

        match compute_neural_hash(path, format) {
            Ok(hash) => println!("{hash}"),
            Err(e @ Error::Unavailable(_)) => {
                // Fatal for the whole batch, not just this image
                eprintln!("Error: critical dependency missing: {e}");
                return ExitCode::FAILURE;
            }
            Err(e) => {
                eprintln!("Error generating NeuralHash for '{}': {}", path.display(), e);
                exit_code = ExitCode::FAILURE;
            }
        }

        if total > 1 && i + 1 < total {
            println!("{}", "-".repeat(30));
        }
    }

    exit_code
}

/// Paths must exist and be regular files before the core pipeline sees them.
fn validate_image_path(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("image path not found: {}", path.display()));
    }
    if !path.is_file() {
        return Err(format!("path is not a file: {}", path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn format_defaults_to_hex() {
        let cli = Cli::parse_from(["neuralhash", "image.jpg"]);
        assert_eq!(cli.format, "hex");
        assert_eq!(cli.image_paths, vec![PathBuf::from("image.jpg")]);
    }

    #[test]
    fn at_least_one_path_is_required() {
        assert!(Cli::try_parse_from(["neuralhash"]).is_err());
    }

    #[test]
    fn missing_path_is_rejected_before_hashing() {
        let err = validate_image_path(Path::new("definitely/not/here.jpg")).unwrap_err();
        assert!(err.contains("not found"));
    }

    #[test]
    fn directory_path_is_rejected_before_hashing() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_image_path(dir.path()).unwrap_err();
        assert!(err.contains("not a file"));
    }

    #[test]
    fn existing_file_passes_validation() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(validate_image_path(file.path()).is_ok());
    }
}
