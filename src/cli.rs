use std::path::PathBuf;

/// Choropleth snapshot CLI (argument schema only)
#[derive(clap::Parser, Debug)]
#[command(name = "riskmap", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Render the current map state to an SVG snapshot
    Render(RenderArgs),

    /// Dump the derived layer descriptors as JSON
    Inspect(InspectArgs),
}

#[derive(clap::Args, Debug)]
pub struct SourceArgs {
    /// Top-level region boundaries (GeoJSON FeatureCollection)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub regions: PathBuf,

    /// Sub-region boundaries (GeoJSON)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub subregions: Option<PathBuf>,

    /// Sub-region centroid points (GeoJSON)
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub centroids: Option<PathBuf>,

    /// Metrics API base URL, e.g. http://localhost:8000/api
    #[arg(long)]
    pub api: Option<String>,

    /// Drill into this region before producing output
    #[arg(long)]
    pub drill: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output SVG path
    #[arg(short, long, default_value = "map.svg", value_hint = clap::ValueHint::FilePath)]
    pub output: PathBuf,

    /// SVG width in pixels
    #[arg(long, default_value_t = 1200)]
    pub width: i32,

    /// SVG margin in pixels
    #[arg(long, default_value_t = 10)]
    pub margin: i32,
}

#[derive(clap::Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}
