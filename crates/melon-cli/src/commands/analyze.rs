use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use melon_core::analysis::PlantAnalyzer;
use melon_core::io::image_io::load_image;
use melon_core::provider::AiBackend;

use super::{spinner, ProviderOpts};
use crate::summary::print_analysis;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Plant image (JPEG or PNG)
    pub file: PathBuf,

    #[command(flatten)]
    pub provider: ProviderOpts,

    /// Custom instruction sent instead of the feature-based prompt
    #[arg(long)]
    pub prompt: Option<String>,

    /// Print JSON instead of a formatted report
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &AnalyzeArgs) -> Result<()> {
    let config = args.provider.load_config()?;
    let backend = args.provider.backend(&config)?;
    let image = load_image(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let analyzer = PlantAnalyzer::new(backend);
    let pb = spinner(&format!("Analysing with {}", analyzer.backend().name()))?;
    let result = analyzer.analyze(&image, args.prompt.as_deref());
    pb.finish_and_clear();
    let result = result.with_context(|| format!("Failed to analyse {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_analysis(&args.file, analyzer.backend().name(), &result);
    }

    if let Err(e) = result.outcome() {
        anyhow::bail!("{} analysis failed: {}", analyzer.backend().name(), e);
    }
    Ok(())
}
