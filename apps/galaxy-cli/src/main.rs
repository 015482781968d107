use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use galaxy_gen::config::{self, PRESET_NAMES};
use galaxy_gen::{GalaxyParameters, PointCloud, RngSource, SplitMix64, generate};
use galaxy_math::{DVec3, normalize, rotate_around_axis};
use galaxy_render::{
    CloudSlot, DebugTextRenderer, MemoryBackend, PointMaterial, RenderView, Renderer,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "galaxy-cli", about = "Procedural galaxy point-cloud generator")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and available presets
    Info,
    /// Print preset parameters as YAML
    Presets {
        /// Only show this preset
        name: Option<String>,
    },
    /// Generate a point cloud and print a summary
    Generate {
        /// Named preset to start from
        #[arg(short, long, default_value = "spiral", conflicts_with = "config")]
        preset: String,
        /// YAML or JSON parameter file to start from
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the point count
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// RNG seed; omit for a fresh random galaxy
        #[arg(short, long)]
        seed: Option<u64>,
        /// Tilt the result around this axis, e.g. 1,0,0
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, requires = "tilt_angle")]
        tilt_axis: Option<DVec3>,
        /// Tilt angle in radians
        #[arg(long, allow_negative_numbers = true, requires = "tilt_axis")]
        tilt_angle: Option<f64>,
        /// Write the cloud as JSON to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Number of points to list in the summary
        #[arg(long, default_value = "5")]
        preview: usize,
    },
    /// Rotate a point around an axis through the origin
    Rotate {
        /// Point as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        point: DVec3,
        /// Axis direction as x,y,z (any non-zero length)
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        axis: DVec3,
        /// Angle in radians, right-hand rule
        #[arg(long, allow_negative_numbers = true)]
        angle: f64,
    },
    /// Scale a vector to unit length
    Normalize {
        /// Vector as x,y,z
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        vector: DVec3,
    },
}

/// On-disk form of a generated cloud.
#[derive(Serialize)]
struct CloudFile<'a> {
    parameters: &'a GalaxyParameters,
    seed: Option<u64>,
    fingerprint: String,
    #[serde(flatten)]
    cloud: &'a PointCloud,
}

fn parse_vec3(s: &str) -> Result<DVec3, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got {s:?}"));
    }
    let mut v = [0.0; 3];
    for (slot, part) in v.iter_mut().zip(&parts) {
        *slot = part
            .parse::<f64>()
            .map_err(|e| format!("invalid component {part:?}: {e}"))?;
    }
    Ok(DVec3::from_array(v))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("galaxy-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", galaxy_render::crate_info());
            println!("presets: {}", PRESET_NAMES.join(", "));
        }
        Commands::Presets { name } => {
            let names: Vec<&str> = match &name {
                Some(n) => vec![n.as_str()],
                None => PRESET_NAMES.to_vec(),
            };
            for n in names {
                let params = config::preset(n)?;
                println!("# {n}");
                print!("{}", config::to_yaml(&params)?);
            }
        }
        Commands::Generate {
            preset,
            config: config_path,
            count,
            seed,
            tilt_axis,
            tilt_angle,
            output,
            preview,
        } => {
            let mut params = match &config_path {
                Some(path) => config::load(path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => config::preset(&preset)?,
            };
            if let Some(count) = count {
                params = params.with_count(count);
            }

            let mut cloud = match seed {
                Some(seed) => generate(params, &mut SplitMix64::new(seed))?,
                None => generate(params, &mut RngSource::from_entropy())?,
            };
            if let (Some(axis), Some(angle)) = (tilt_axis, tilt_angle) {
                cloud = cloud.rotated_around_axis(axis, angle)?;
            }

            let fingerprint = cloud.fingerprint();
            let view = match cloud.bounds() {
                Some(b) => RenderView::framing(b.max.abs().max(b.min.abs()).length(), 75.0),
                None => RenderView::default(),
            };
            print!(
                "{}",
                DebugTextRenderer::with_preview(preview).render(&cloud, &view)
            );
            println!("Mode: {}", params.geometry.name());
            match seed {
                Some(seed) => println!("Seed: {seed}"),
                None => println!("Seed: (entropy)"),
            }
            println!("Fingerprint: {fingerprint}");

            let mut slot = CloudSlot::new(MemoryBackend::new());
            slot.replace(&cloud, &PointMaterial::with_size(params.size))?;
            println!("Vertex buffer: {} bytes", slot.backend().live_bytes());

            if let Some(path) = output {
                let file = File::create(&path)
                    .with_context(|| format!("creating {}", path.display()))?;
                let doc = CloudFile {
                    parameters: &params,
                    seed,
                    fingerprint,
                    cloud: &cloud,
                };
                serde_json::to_writer(BufWriter::new(file), &doc)?;
                tracing::info!(path = %path.display(), points = cloud.len(), "cloud written");
            }
        }
        Commands::Rotate { point, axis, angle } => {
            let p = rotate_around_axis(point, axis, angle)?;
            println!("{:.12}, {:.12}, {:.12}", p.x, p.y, p.z);
        }
        Commands::Normalize { vector } => {
            let v = normalize(vector)?;
            println!("{:.12}, {:.12}, {:.12}", v.x, v.y, v.z);
        }
    }

    Ok(())
}
