use std::error::Error;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{exit, Command};

use clap::{Parser, Subcommand, ValueEnum};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const CORE_PACKAGE: &str = "catalog_scan_core";
const LAMBDA_PACKAGE: &str = "catalog_scan_lambda";
const LAMBDA_BINARY: &str = "catalog_lambda";

type TaskResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "xtask", about = "Build, check and package the catalog scan Lambda")]
struct Cli {
    #[command(subcommand)]
    command: Task,
}

#[derive(Subcommand)]
enum Task {
    /// Test both catalog crates
    Test,
    /// fmt --check, clippy -D warnings, then tests
    Ci,
    /// Build `catalog_lambda` and zip it as `bootstrap`
    ServerlessPackage {
        #[arg(long, default_value = "x86_64-unknown-linux-gnu")]
        target: String,
        #[arg(value_enum, long, default_value_t = Profile::Release)]
        profile: Profile,
        /// Directory that receives `catalog_lambda.zip`
        #[arg(long, default_value = "dist")]
        out_dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Profile {
    Debug,
    Release,
}

fn cargo(args: &[&str]) -> TaskResult {
    eprintln!("+ cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("`cargo {}` exited with {status}", args.join(" ")).into())
    }
}

fn test() -> TaskResult {
    cargo(&["test", "-p", CORE_PACKAGE])?;
    cargo(&["test", "-p", LAMBDA_PACKAGE])
}

fn ci() -> TaskResult {
    cargo(&["fmt", "--all", "--", "--check"])?;
    cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])?;
    test()
}

fn serverless_package(target: &str, profile: Profile, out_dir: &Path) -> TaskResult {
    let mut build = vec!["build", "-p", LAMBDA_PACKAGE, "--bin", LAMBDA_BINARY, "--target", target];
    let profile_dir = match profile {
        Profile::Debug => "debug",
        Profile::Release => {
            build.push("--release");
            "release"
        }
    };
    cargo(&build)?;

    let binary = Path::new("target")
        .join(target)
        .join(profile_dir)
        .join(LAMBDA_BINARY);
    fs::create_dir_all(out_dir)?;
    let archive = out_dir.join(format!("{LAMBDA_BINARY}.zip"));
    write_bootstrap_zip(&binary, &archive)?;

    eprintln!("packaged {}", archive.display());
    Ok(())
}

/// Writes `binary` as the single executable `bootstrap` entry the
/// `provided.al2023` runtime expects.
fn write_bootstrap_zip(binary: &Path, archive: &Path) -> TaskResult {
    let bytes = fs::read(binary)
        .map_err(|error| format!("cannot read lambda binary '{}': {error}", binary.display()))?;

    let mut zip = ZipWriter::new(File::create(archive)?);
    zip.start_file(
        "bootstrap",
        FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o755),
    )?;
    zip.write_all(&bytes)?;
    zip.finish()?;
    Ok(())
}

fn main() {
    let result = match Cli::parse().command {
        Task::Test => test(),
        Task::Ci => ci(),
        Task::ServerlessPackage {
            target,
            profile,
            out_dir,
        } => serverless_package(&target, profile, &out_dir),
    };

    if let Err(error) = result {
        eprintln!("xtask failed: {error}");
        exit(1);
    }
}
