use clap::{Parser, Subcommand};
use rfg_favicons::cache::{DEFAULT_STORE_PATH, FileStore};
use rfg_favicons::config::{self, EffectiveOptions};
use rfg_favicons::paths::{BuildPaths, DEFAULT_CACHE_DIR, DEFAULT_PUBLIC_DIR};
use rfg_favicons::publish::ManifestTransform;
use rfg_favicons::request::{self, CompiledRequest, merge_json};
use rfg_favicons::service::RfgClient;
use rfg_favicons::{digest, gate, output, publish};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rfg-favicons")]
#[command(about = "Generate favicons with RealFaviconGenerator, only when they changed")]
#[command(long_about = "\
Generate favicons with RealFaviconGenerator, only when they changed

Options in favicon.toml are compiled into a generation request. The request's
digest is compared with the one stored after the last successful generation;
the service is only called when they differ or the generated files are gone.

Layout:

  favicon.toml                          # Options (paths relative to this file)
  .cache/realfavicongenerator/          # Last generated package + response.json
  .cache/rfg-favicons-store.json        # Digest of the last successful request
  public/favicons/                      # Published package
  public/favicon.ico                    # Copy for browsers that only check the root

A failed generation is logged and the previous favicons stay in place.
Set RUST_LOG=debug for more detail.

Run 'rfg-favicons gen-config' to generate a documented favicon.toml.")]
#[command(version)]
struct Cli {
    /// Favicon options file
    #[arg(long, default_value = "favicon.toml", global = true)]
    config: PathBuf,

    /// Directory holding the last generated package
    #[arg(long, default_value = DEFAULT_CACHE_DIR, global = true)]
    cache_dir: PathBuf,

    /// File storing the digest of the last successful request
    #[arg(long, default_value = DEFAULT_STORE_PATH, global = true)]
    store: PathBuf,

    /// Public directory the site is served from
    #[arg(long, default_value = DEFAULT_PUBLIC_DIR, global = true)]
    public: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile, generate if needed, and publish favicons
    Build {
        /// Call the service even if the request is unchanged
        #[arg(long)]
        force: bool,
    },
    /// Print the compiled generation request as JSON
    Compile,
    /// Print the digest of the compiled request
    Digest,
    /// Validate options and compile the request without calling the service
    Check,
    /// Print the `<head>` markup of the published favicons
    Head,
    /// Print a stock favicon.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = BuildPaths::new(&cli.cache_dir, &cli.public);

    match cli.command {
        Command::Build { force } => {
            let options = config::load_options(&cli.config)?;
            let request = compile(&options, &cli.config)?;
            let client = RfgClient::new()?;
            let mut store = FileStore::open(&cli.store);

            println!(
                "==> Checking favicons ({}, store {})",
                cli.config.display(),
                store.path().display()
            );
            let report = gate::run(&request, &client, &mut store, &paths, force)?;

            let merge_override = |manifest: Value| {
                let overlay = options.manifest_override.clone()?;
                Some(merge_json(manifest, Value::Object(overlay)))
            };
            let transform = options
                .manifest_override
                .is_some()
                .then_some(&merge_override as ManifestTransform<'_>);
            let published = publish::publish(&paths, transform)?;
            output::print_build_output(&report, &published, &paths);
        }
        Command::Compile => {
            let options = config::load_options(&cli.config)?;
            let request = compile(&options, &cli.config)?;
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
        Command::Digest => {
            let options = config::load_options(&cli.config)?;
            let request = compile(&options, &cli.config)?;
            println!("{}", digest::request_digest(&request));
        }
        Command::Check => {
            println!("==> Checking {}", cli.config.display());
            let options = config::load_options(&cli.config)?;
            let request = compile(&options, &cli.config)?;
            output::print_compile_output(&request, &digest::request_digest(&request));
            println!("==> Options are valid");
        }
        Command::Head => {
            if let Some(markup) = publish::head_markup(&paths)? {
                println!("{}", markup);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Compile options with paths resolved against the config file's directory.
fn compile(
    options: &EffectiveOptions,
    config_path: &Path,
) -> Result<CompiledRequest, request::CompileError> {
    let base_dir = config_path.parent().unwrap_or(Path::new("."));
    request::assemble(options, base_dir)
}
