use std::path::Path;

use console::Style;
use melon_core::analysis::AnalysisResult;
use melon_core::consts::CANONICAL_PIXEL_COUNT;
use melon_core::features::FeatureVector;

struct Styles {
    title: Style,
    label: Style,
    value: Style,
    error: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().green().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            error: Style::new().red().bold(),
            path: Style::new().underlined(),
        }
    }
}

fn print_feature_rows(s: &Styles, features: &FeatureVector) {
    let coverage = features.leaf_area_estimate as f64 / CANONICAL_PIXEL_COUNT as f64 * 100.0;
    println!(
        "  {:<20}{}",
        s.label.apply_to("Green intensity"),
        s.value.apply_to(format!("{:.2}", features.green_intensity))
    );
    println!(
        "  {:<20}{}",
        s.label.apply_to("Yellow/brown ratio"),
        s.value.apply_to(format!("{:.2}", features.yellow_brown_ratio))
    );
    println!(
        "  {:<20}{} px ({:.1}% of frame)",
        s.label.apply_to("Leaf area"),
        s.value.apply_to(features.leaf_area_estimate),
        coverage
    );
}

pub fn print_features(file: &Path, features: &FeatureVector) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Plant Features"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(14)));
    println!();
    println!("  {:<20}{}", s.label.apply_to("Image"), s.path.apply_to(file.display()));
    print_feature_rows(&s, features);
    println!();
}

pub fn print_analysis(file: &Path, provider: &str, result: &AnalysisResult) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Plant Analysis"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(14)));
    println!();
    println!("  {:<20}{}", s.label.apply_to("Image"), s.path.apply_to(file.display()));
    println!("  {:<20}{}", s.label.apply_to("Provider"), s.value.apply_to(provider));
    print_feature_rows(&s, &result.features);
    println!();

    match result.outcome() {
        Ok(narrative) => println!("{}", narrative.trim()),
        Err(e) => println!("  {} {}", s.error.apply_to("Analysis failed:"), e),
    }
    println!();
}

pub fn print_reply(provider: &str, reply: &str) {
    let s = Styles::new();
    println!();
    println!("  {}", s.title.apply_to(provider));
    println!();
    println!("{}", reply.trim());
    println!();
}
