use clap::Parser;
use fight_analyzer::ai::{AnalysisConfig, FightAnalysisClient, GeminiProvider};
use fight_analyzer::commands::{run_analysis, AnalysisForm, FAILURE_HEADLINE};
use fight_analyzer::render::render_report;
use fight_analyzer::weight_class::WEIGHT_CLASSES;
use std::path::PathBuf;
use std::process::ExitCode;

/// Compare two fighters from their footage and get a game plan
#[derive(Parser, Debug)]
#[command(name = "fight-analyzer", version, about)]
struct Args {
    /// Your fighter's name
    #[arg(long, default_value = "")]
    fighter: String,

    /// Opponent's name
    #[arg(long, default_value = "")]
    opponent: String,

    /// Weight class, e.g. "Heavyweight (265 lbs)" or "heavyweight"
    #[arg(long, required_unless_present = "list_weight_classes")]
    weight_class: Option<String>,

    /// Footage of your fighter (50 MB max)
    #[arg(long, required_unless_present = "list_weight_classes")]
    fighter_video: Option<PathBuf>,

    /// Footage of the opponent (50 MB max)
    #[arg(long, required_unless_present = "list_weight_classes")]
    opponent_video: Option<PathBuf>,

    /// Model override (otherwise GEMINI_MODEL or the default)
    #[arg(long)]
    model: Option<String>,

    /// Print the result as JSON instead of text cards
    #[arg(long)]
    json: bool,

    /// Print the available weight classes and exit
    #[arg(long)]
    list_weight_classes: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    fight_analyzer::init();
    let args = Args::parse();

    if args.list_weight_classes {
        for class in WEIGHT_CLASSES.iter() {
            println!("{}", class.label());
        }
        return ExitCode::SUCCESS;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", FAILURE_HEADLINE);
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), String> {
    let mut config = AnalysisConfig::from_env().map_err(|e| e.to_string())?;
    if let Some(model) = args.model {
        config.model = model;
    }
    if !config.has_api_key() {
        tracing::warn!("No GEMINI_API_KEY or API_KEY set; the provider will reject the request");
    }

    let provider = GeminiProvider::new(config).map_err(|e| e.to_string())?;
    let client = FightAnalysisClient::new(provider);

    let form = AnalysisForm {
        fighter_name: args.fighter,
        opponent_name: args.opponent,
        weight_class: args.weight_class.unwrap_or_default(),
        fighter_video: args.fighter_video.unwrap_or_default(),
        opponent_video: args.opponent_video.unwrap_or_default(),
    };

    let report = run_analysis(&client, form)
        .await
        .map_err(|e| e.to_string())?;

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize report: {}", e))?;
        println!("{}", json);
    } else {
        print!(
            "{}",
            render_report(&report.analysis, &report.fighter_name, &report.opponent_name)
        );
    }

    Ok(())
}
