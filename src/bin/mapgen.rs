use clap::Parser;
use depthgen::config::{self, MapGenConfig};
use depthgen::depth_map::DepthMap;
use depthgen::errors::MapGenResult;
use depthgen::generators::{ALGORITHMS, ALIASES, MapGenerator, get_generator_preset};
use std::path::PathBuf;
use tracing::{Level, info};

mod mapgen {
    pub mod cli_utils;
    pub mod generator_builder;
}

use mapgen::cli_utils::*;
use mapgen::generator_builder::{GeneratorBuilder, TunnelOverrides};

#[derive(Parser, Clone)]
#[command(name = "mapgen")]
#[command(about = "Generate seamless grayscale depth maps")]
struct Args {
    /// Generation algorithm (see --list; `cellular` is an alias of organic-cavity)
    #[arg(long, default_value = "tunnel-lattice")]
    algorithm: String,

    /// Image size in pixels (format: WIDTHxHEIGHT)
    #[arg(long, default_value = "512x512")]
    size: String,

    /// Random seed for reproducible generation
    #[arg(long)]
    seed: Option<u32>,

    /// Output file (.png for grayscale PNG, .rgba or .raw for raw RGBA bytes)
    #[arg(long, default_value = "depth_map.png")]
    output: PathBuf,

    /// Config file to read instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of lattice nodes (tunnel-lattice only)
    #[arg(long)]
    nodes: Option<u32>,

    /// Base tunnel radius in pixels (tunnel-lattice only)
    #[arg(long)]
    radius: Option<f64>,

    /// Extra loop edges beyond the lattice (tunnel-lattice only)
    #[arg(long)]
    extra_loops: Option<u32>,

    /// Tunnel bend strength, 0.0-1.0 (tunnel-lattice only)
    #[arg(long)]
    curviness: Option<f64>,

    /// Segments per tunnel path (tunnel-lattice only)
    #[arg(long)]
    curve_steps: Option<u32>,

    /// Node jitter as a fraction of a cell, 0.0-1.0 (tunnel-lattice only)
    #[arg(long)]
    jitter: Option<f64>,

    /// List algorithms with their versions and default parameters
    #[arg(long)]
    list: bool,

    /// Write the effective config to the default config location
    #[arg(long)]
    save_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn tunnel_overrides(&self) -> TunnelOverrides {
        TunnelOverrides {
            nodes: self.nodes,
            radius: self.radius,
            extra_loops: self.extra_loops,
            curviness: self.curviness,
            curve_steps: self.curve_steps,
            jitter: self.jitter,
        }
    }
}

fn main() -> MapGenResult<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .init();

    let config = match &args.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config(),
    };

    if args.list {
        return print_algorithms(&config);
    }

    if args.save_config {
        let path = config::save_config(&config)?;
        info!(path = %path.display(), "saved config");
    }

    let (width, height) = parse_size(&args.size)?;
    let format = output_format(&args.output)?;

    let generator = GeneratorBuilder::new(args.algorithm.clone())
        .seed(args.seed)
        .config(config)
        .overrides(args.tunnel_overrides())
        .build()?;

    info!(
        algorithm = generator.algorithm_name(),
        version = generator.version(),
        seed = generator.seed,
        width,
        height,
        "generating depth map"
    );
    let map = generator.generate(width, height)?;

    match format {
        OutputFormat::Png => map.save_png(&args.output)?,
        OutputFormat::RawRgba => map.save_rgba(&args.output)?,
    }

    print_map_summary(&generator, &map, &args.output);
    Ok(())
}

fn print_algorithms(config: &MapGenConfig) -> MapGenResult<()> {
    for name in ALGORITHMS {
        let generator = get_generator_preset(name, Some(0), config)?;
        let aliases: Vec<&str> = ALIASES
            .iter()
            .filter(|(_, target)| target == name)
            .map(|(alias, _)| *alias)
            .collect();
        if aliases.is_empty() {
            println!("{} (v{})", generator.algorithm_name(), generator.version());
        } else {
            println!(
                "{} (v{}, alias: {})",
                generator.algorithm_name(),
                generator.version(),
                aliases.join(", ")
            );
        }
        for line in generator.kind.parameters_toml()?.lines() {
            println!("  {line}");
        }
        println!();
    }
    Ok(())
}

fn print_map_summary(generator: &MapGenerator, map: &DepthMap, output: &std::path::Path) {
    println!("Depth map saved successfully to: {}", output.display());
    println!("\nMap summary:");
    println!(
        "  Algorithm: {} v{} (seed {})",
        generator.algorithm_name(),
        generator.version(),
        generator.seed
    );
    println!(
        "  Size: {}x{} ({} pixels)",
        map.width,
        map.height,
        map.pixels.len()
    );

    let min = map.pixels.iter().copied().min().unwrap_or(0);
    let max = map.pixels.iter().copied().max().unwrap_or(0);
    println!("  Depth range: {min}..={max}, mean {:.1}", map.mean());
}
