use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use melon_core::features::extract_features;
use melon_core::io::image_io::load_image;

use crate::summary::print_features;

#[derive(Args)]
pub struct FeaturesArgs {
    /// Plant image (JPEG or PNG)
    pub file: PathBuf,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &FeaturesArgs) -> Result<()> {
    let image = load_image(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let features = extract_features(&image)
        .with_context(|| format!("Failed to analyse {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&features)?);
    } else {
        print_features(&args.file, &features);
    }
    Ok(())
}
