use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "agrorisk", version, about = "Agricultural zone risk dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-run interactive setup
    Init,
    /// Validate config and crop rules
    Check,
    /// Classify a zones CSV without the dashboard
    Evaluate {
        /// CSV with zona, lat, lon, cultivo columns
        #[arg(long)]
        zones: PathBuf,

        /// Only import zones of these crops (repeatable)
        #[arg(long = "crop")]
        crops: Vec<String>,

        /// Write the results workbook here
        #[arg(long)]
        xlsx: Option<PathBuf>,

        /// Write the results GeoJSON here
        #[arg(long)]
        geojson: Option<PathBuf>,
    },
    /// Download an NDVI image from Sentinel Hub
    FetchNdvi {
        /// south,west,north,east
        #[arg(long)]
        bbox: Option<String>,

        /// Image width and height in pixels
        #[arg(long)]
        size: Option<u32>,

        /// YYYY-MM-DD/YYYY-MM-DD
        #[arg(long)]
        time: Option<String>,

        /// Output PNG path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_takes_zones_flag() {
        let cli = Cli::parse_from([
            "agrorisk", "evaluate", "--zones", "zonas.csv", "--crop", "maíz", "--crop", "arroz",
        ]);
        match cli.command {
            Some(Commands::Evaluate { zones, crops, xlsx, .. }) => {
                assert_eq!(zones, PathBuf::from("zonas.csv"));
                assert_eq!(crops, vec!["maíz", "arroz"]);
                assert!(xlsx.is_none());
            }
            _ => panic!("expected evaluate"),
        }
    }

    #[test]
    fn evaluate_rejects_positional_zones() {
        assert!(Cli::try_parse_from(["agrorisk", "evaluate", "zonas.csv"]).is_err());
    }
}
