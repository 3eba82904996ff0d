use clap::Parser;
use env_logger::{Builder, Env};
use log::{error, info};
use objmesh::io::config::Config;
use objmesh::io::obj_loader::ParseMode;
use objmesh::scene::assets::{LoadedAsset, load_assets};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

/// Loads OBJ meshes into indexed vertex buffers and reports what came out.
#[derive(Parser, Debug)]
#[command(name = "objmesh", version)]
#[command(about = "Load Wavefront OBJ meshes and print vertex, triangle and bounding box stats")]
struct Cli {
    /// OBJ files to load
    #[arg(value_name = "FILE", required_unless_present = "config")]
    files: Vec<PathBuf>,

    /// Asset manifest (TOML); replaces FILE and the flags below
    #[arg(short, long, value_name = "FILE", conflicts_with_all = ["files", "strict", "normalize", "tangents"])]
    config: Option<PathBuf>,

    /// Reject malformed numbers and short attribute lines
    #[arg(long)]
    strict: bool,

    /// Center each mesh and scale it into a unit bounding box
    #[arg(long)]
    normalize: bool,

    /// Compute tangent frames for normal mapping
    #[arg(long)]
    tangents: bool,
}

/// Logger configured from `env`; the filter it carries is the only level rule.
fn log_builder(env: Env) -> Builder {
    let mut builder = Builder::from_env(env);
    builder.format_timestamp(None);
    builder
}

fn main() -> ExitCode {
    log_builder(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => {
            info!("Loading asset manifest: {}", path.display());
            match Config::load(path) {
                Ok(config) => config,
                Err(e) => {
                    error!("{e}");
                    return ExitCode::FAILURE;
                }
            }
        }
        None => {
            let parse_mode = if cli.strict {
                ParseMode::Strict
            } else {
                ParseMode::Lenient
            };
            Config::from_files(cli.files, parse_mode, cli.normalize, cli.tangents)
        }
    };

    let start_time = Instant::now();
    match load_assets(&config) {
        Ok(assets) => {
            for asset in &assets {
                print_report(asset);
            }
            info!("Done in {:.2?}", start_time.elapsed());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn print_report(asset: &LoadedAsset) {
    println!(
        "{}: {} vertices, {} triangles",
        asset.name,
        asset.mesh.vertex_count(),
        asset.mesh.triangle_count()
    );
    match &asset.bounds {
        Some(bounds) => {
            let center = bounds.center();
            let extent = bounds.extents();
            println!("  Center {:.6} {:.6} {:.6}", center.x, center.y, center.z);
            println!("  DX {:.6} DY {:.6} DZ {:.6}", extent.x, extent.y, extent.z);
        }
        None => println!("  (no vertices)"),
    }
    if asset.tangents.is_some() {
        println!("  tangent frames: {}", asset.mesh.vertex_count());
    }
}
