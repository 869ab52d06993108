use clap::Args;
use risko::config::{AppConfig, GeocoderKind};
use risko::error::AppError;
use risko::recommendations::recommendations_for;
use risko::scoring::AnalysisResult;
use risko::service::build_engine;

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Free-text address, e.g. "Kadıköy, İstanbul"
    pub(crate) address: String,
    /// Building age in years
    #[arg(long)]
    pub(crate) building_age: Option<u32>,
    /// Also print recommendations for the elevated hazards
    #[arg(long)]
    pub(crate) detailed: bool,
    /// Skip the external geocoder and use the built-in city table
    #[arg(long)]
    pub(crate) offline: bool,
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if args.offline {
        config.geocoding.provider = GeocoderKind::Offline;
    }

    let address = args.address.trim();
    if address.is_empty() {
        return Err(AppError::BadRequest("Address must not be empty".into()));
    }

    let engine = build_engine(&config)?;
    let result = engine.analyze(address, args.building_age).await?;
    if !result.is_resolved() {
        return Err(AppError::NotFound(format!("Address not found: {address}")));
    }

    print!("{}", render(&result, args.detailed));
    Ok(())
}

fn render(result: &AnalysisResult, detailed: bool) -> String {
    let mut out = String::new();
    out.push_str(&format!("Address: {}\n", result.address));
    if let Some(coordinate) = result.coordinate() {
        out.push_str(&format!(
            "Location: {:.4}, {:.4}\n",
            coordinate.latitude, coordinate.longitude
        ));
    }
    if let Some(age) = result.building_age {
        out.push_str(&format!("Building age: {age} years\n"));
    }

    out.push_str("\nHazard scores\n");
    for (hazard, score) in result.scores.iter() {
        out.push_str(&format!("  {:<10} {:>6.2}\n", hazard.label(), score));
    }
    out.push_str(&format!(
        "\nOverall: {:.2} ({})\n",
        result.overall_risk_score, result.risk_level
    ));

    if detailed {
        let recommendations = recommendations_for(&result.scores);
        if recommendations.is_empty() {
            out.push_str("\nNo recommendations: every hazard is low.\n");
        } else {
            out.push_str("\nRecommendations\n");
            for rec in recommendations {
                out.push_str(&format!(
                    "  [P{}] {} ({} / {}): {}\n",
                    rec.priority, rec.title, rec.risk_type, rec.risk_level, rec.description
                ));
            }
        }
    }

    out
}
