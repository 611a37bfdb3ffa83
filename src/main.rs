use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use webpress::imaging::{Quality, RustBackend};
use webpress::{config, convert, manifest, output, walk};

/// Flags for the convert subcommand. CLI values override `webpress.toml`.
#[derive(clap::Args, Clone)]
struct ConvertArgs {
    /// WebP quality (1-100)
    #[arg(long)]
    quality: Option<u32>,

    /// Maximum parallel workers (default: CPU cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Where to write the JSON manifest of new outputs
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Skip writing the manifest
    #[arg(long)]
    no_manifest: bool,
}

#[derive(Parser)]
#[command(name = "webpress")]
#[command(about = "Content-addressed WebP conversion for photo trees")]
#[command(long_about = "\
Content-addressed WebP conversion for photo trees

Recursively converts every .jpg/.jpeg/.png under the root directory to
lossy WebP, naming each output by the SHA-256 hash of the source bytes:

  photos/travel/cat.jpg  ->  photos/travel/3f2a...ce.webp

Identical photos share one output, and re-running over a converted tree
performs zero encodes. Unless disabled, the relative paths of newly
produced files are written to paths.json as {\"imagePaths\": [...]}.

Optional configuration lives in <root>/webpress.toml; run
'webpress gen-config' for a documented example.")]
#[command(version)]
struct Cli {
    /// Root directory to convert
    #[arg(long, default_value = "photos", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert the tree, writing <hash>.webp beside each source image
    Convert(ConvertArgs),
    /// Dry run: report what convert would do without encoding
    Scan,
    /// Print a stock webpress.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Convert(args) => run_convert(&cli.root, args),
        Command::Scan => run_scan(&cli.root),
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(())
        }
    }
}

fn run_convert(root: &Path, args: ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::load_config(root)?;
    let quality = Quality::new(args.quality.unwrap_or(cfg.images.quality));
    init_thread_pool(&cfg.processing, args.threads);

    let discovery = walk::discover(root)?;
    report_walk_errors(&discovery);
    println!(
        "Converting {} ({} images)",
        root.display(),
        discovery.images.len()
    );

    let (tx, rx) = mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_convert_event(&event);
        }
    });
    let outcome = convert::convert_tree(&RustBackend::new(), &discovery.images, quality, Some(tx));
    printer.join().unwrap();

    if cfg.manifest.write && !args.no_manifest {
        let path = args
            .manifest
            .unwrap_or_else(|| PathBuf::from(&cfg.manifest.path));
        let m = manifest::Manifest::new(outcome.records);
        m.save(&path)?;
        println!("Manifest: {} ({} paths)", path.display(), m.len());
    }

    println!("{}", outcome.stats);
    Ok(())
}

fn run_scan(root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let discovery = walk::discover(root)?;
    report_walk_errors(&discovery);

    let plan = convert::plan_tree(&discovery.images);
    output::print_scan_output(&plan);
    Ok(())
}

fn report_walk_errors(discovery: &walk::Discovery) {
    for err in &discovery.errors {
        eprintln!("walk: {err}");
    }
}

/// Initialize the rayon thread pool from processing config.
///
/// Capped at the number of available CPU cores; the user can constrain
/// down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig, cli_override: Option<usize>) {
    let threads = config::effective_threads(processing, cli_override);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
