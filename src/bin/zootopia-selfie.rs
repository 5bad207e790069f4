//! CLI for Zootopia Selfie.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use zootopia_selfie::{
    Config, Controller, EncodedImage, GeminiModel, GeminiProviderBuilder, ImageProvider,
    ScenarioId, SCENARIOS,
};

#[derive(Parser)]
#[command(name = "zootopia-selfie")]
#[command(about = "Turn a photo into a group selfie with Judy Hopps and Nick Wilde")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a selfie from a photo
    Generate(GenerateArgs),

    /// List available scenarios
    Scenarios,

    /// Open the desktop window
    Gui(ServiceArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Photo to edit (PNG, JPEG or WEBP)
    #[arg(short, long)]
    input: PathBuf,

    /// Scenario to use
    #[arg(short, long, value_enum, default_value = "city")]
    scenario: ScenarioArg,

    /// Directory the result is saved into
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    #[command(flatten)]
    service: ServiceArgs,
}

#[derive(Args)]
struct ServiceArgs {
    /// API key (defaults to API_KEY / GOOGLE_API_KEY / GEMINI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Image model
    #[arg(short, long, value_enum)]
    model: Option<ModelArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScenarioArg {
    City,
    Christmas,
    Cny,
}

impl From<ScenarioArg> for ScenarioId {
    fn from(arg: ScenarioArg) -> Self {
        match arg {
            ScenarioArg::City => ScenarioId::City,
            ScenarioArg::Christmas => ScenarioId::Christmas,
            ScenarioArg::Cny => ScenarioId::Cny,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModelArg {
    #[value(name = "nano-banana")]
    NanoBanana,
    #[value(name = "nano-banana-pro")]
    NanoBananaPro,
}

impl From<ModelArg> for GeminiModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::NanoBanana => GeminiModel::NanoBanana,
            ModelArg::NanoBananaPro => GeminiModel::NanoBananaPro,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // The window loop must own the main thread, so the runtime is built here
    // rather than by `#[tokio::main]`.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Commands::Generate(args) => {
            runtime.block_on(generate(args, cli.json))?;
        }
        Commands::Scenarios => {
            list_scenarios(cli.json)?;
        }
        Commands::Gui(args) => {
            run_gui(args, runtime.handle().clone())?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "zootopia_selfie=debug"
    } else {
        "zootopia_selfie=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(args: &ServiceArgs) -> Config {
    let mut config = Config::from_env();
    if let Some(ref key) = args.api_key {
        config = config.with_api_key(key);
    }
    if let Some(model) = args.model {
        config = config.with_model(model.into());
    }
    config
}

async fn generate(args: GenerateArgs, json_output: bool) -> anyhow::Result<()> {
    let mut config = resolve_config(&args.service);
    if let Some(dir) = args.output_dir {
        config = config.with_output_dir(dir);
    }
    let provider = GeminiProviderBuilder::from_config(&config).build()?;
    let model = provider.model().to_string();
    let mut controller = Controller::new(Arc::new(provider));

    controller.set_image(Some(EncodedImage::from_file(&args.input)?));
    controller.select_scenario(args.scenario.into());

    let scenario = controller.state().selected_scenario.scenario();
    if !json_output {
        eprintln!(
            "{} Inviting Judy and Nick to your photo ({})... this might take 10-20 seconds.",
            scenario.icon, scenario.name
        );
    }

    controller.generate().await;

    if let Some(ref error) = controller.state().error {
        if json_output {
            let result = serde_json::json!({
                "success": false,
                "scenario": scenario.id,
                "error": error,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
            std::process::exit(1);
        }
        anyhow::bail!("{error}");
    }

    let path = controller
        .download(&config.output_dir)?
        .ok_or_else(|| anyhow::anyhow!("generation finished without a result"))?;

    if json_output {
        let result = serde_json::json!({
            "success": true,
            "scenario": scenario.id,
            "model": model,
            "output": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Saved selfie: {} ({})", path.display(), scenario.name);
    }

    Ok(())
}

fn list_scenarios(json_output: bool) -> anyhow::Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(&SCENARIOS)?);
    } else {
        println!("Available scenarios:\n");
        for s in SCENARIOS.iter() {
            println!("  {} {} ({})", s.icon, s.name, s.id);
            println!("    {}", s.description);
        }
    }
    Ok(())
}

#[cfg(feature = "gui")]
fn run_gui(args: ServiceArgs, runtime: tokio::runtime::Handle) -> anyhow::Result<()> {
    let config = resolve_config(&args);
    zootopia_selfie::ui::run(config, runtime)
        .map_err(|e| anyhow::anyhow!("failed to start UI: {e}"))
}

#[cfg(not(feature = "gui"))]
fn run_gui(_args: ServiceArgs, _runtime: tokio::runtime::Handle) -> anyhow::Result<()> {
    anyhow::bail!("desktop window not enabled (rebuild with --features gui)");
}
