use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colorsweep::constants::extraction::MAX_ITERATIONS;
use colorsweep::{
    BatchRunner, ClusterConfig, ColorConverter, KmeansExtractor, ReferencePalette, RunConfig, SweepError,
};
use palette::WithAlpha;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "colorsweep")]
#[command(version, about = "Compare dominant color extraction settings against a reference palette", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sweep every image of a directory and write the HTML report
    Run {
        /// Input directory or image file (overrides the config file)
        #[arg(value_name = "INPUT")]
        input: Option<PathBuf>,

        /// JSON run configuration
        #[arg(short = 'c', long, value_name = "FILE")]
        config_file: Option<PathBuf>,

        /// HTML report path
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Number of clusters per configuration
        #[arg(short = 'k', long, value_name = "K")]
        clusters: Option<usize>,

        /// Configuration to sweep: bits ("76") or flag names ("mean+no-crop+ciede2000"); repeatable
        #[arg(long = "config", value_name = "FLAGS")]
        configs: Vec<ClusterConfig>,

        /// Larger image dimension before clustering (0 keeps the original size)
        #[arg(long, value_name = "PIXELS")]
        resize: Option<u32>,

        /// Image extension to process; repeatable
        #[arg(long = "ext", value_name = "EXT")]
        extensions: Vec<String>,

        /// Also write the report data as JSON
        #[arg(long)]
        json: bool,

        /// Seed for k-means initialization
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Write the default run configuration as JSON
    InitConfig {
        /// Destination file
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },

    /// Print the label of one or more configurations
    Describe {
        #[arg(value_name = "FLAGS", required = true)]
        configs: Vec<ClusterConfig>,
    },

    /// Find the nearest reference palette color for hex colors
    Match {
        #[arg(value_name = "HEX", required = true)]
        colors: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colorsweep=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(error) = execute(cli.command) {
        eprintln!("Error: {:#}", error);
        if let Some(sweep_error) = error.downcast_ref::<SweepError>() {
            eprintln!("Suggestion: {}", sweep_error.user_message());
        }
        process::exit(1);
    }
}

fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            input,
            config_file,
            output,
            clusters,
            configs,
            resize,
            extensions,
            json,
            seed,
        } => {
            let mut config = match config_file {
                Some(path) => RunConfig::from_json_file(&path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => RunConfig::default_sweep(),
            };
            if let Some(input) = input {
                config.input_path = input;
            }
            if let Some(output) = output {
                config.output_path = output;
            }
            if let Some(k) = clusters {
                config.cluster_count = k;
            }
            if !configs.is_empty() {
                config.configurations = configs;
            }
            if let Some(size) = resize {
                config.resize_size = size;
            }
            if !extensions.is_empty() {
                config.extensions = extensions;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            config.write_json |= json;

            let extractor = KmeansExtractor::with_params(config.seed, MAX_ITERATIONS);
            let runner = BatchRunner::new(config, extractor, Arc::new(ReferencePalette::new()))
                .context("invalid run configuration")?;
            let report = runner.run().context("sweep failed")?;
            runner.write_outputs(&report).context("writing report")?;

            if report.is_empty() {
                tracing::warn!("No images were processed");
            }
        }

        Commands::InitConfig { path } => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            let config = RunConfig::default_sweep();
            config.to_json_file(&path)?;

            tracing::info!(path = %path.display(), "Configuration saved");
            for entry in &config.configurations {
                println!("K={}, {}", config.cluster_count, entry.label());
            }
        }

        Commands::Describe { configs } => {
            for config in configs {
                println!("{:>4}  {}", config.bits(), config.label());
            }
        }

        Commands::Match { colors } => {
            let converter = ColorConverter::new();
            let palette = ReferencePalette::new();
            for hex in colors {
                let rgb = converter.hex_to_rgb(&hex)?;
                let nearest = palette.find_nearest(rgb.with_alpha(255))?;
                println!("{} -> {} {:.2}", converter.rgb_to_hex(rgb), nearest.hex, nearest.distance);
            }
        }
    }

    Ok(())
}
