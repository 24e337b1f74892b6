use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use leafwatch::core_modules::stress::{PlantSize, WeatherReading};
use leafwatch::reasoning::backend_from_config;
use leafwatch::{
    BackendKind, GrowingConditions, LeafwatchConfig, LeafwatchError, PipelineConfig, ReportFormat,
    StressPipeline,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "leafwatch", version, about = "Single-plant water stress report from a photo")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Remote reasoning backend, overriding configuration.
    #[arg(long, global = true, value_enum)]
    backend: Option<BackendArg>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    Local,
    Hosted,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Local => BackendKind::Local,
            BackendArg::Hosted => BackendKind::Hosted,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a plant photo, score its water stress, and print a report (default).
    Analyze(AnalyzeArgs),
    /// Ask the vision model for a free-form description of an image.
    Describe(DescribeArgs),
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum FormatArg {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Default, Args)]
struct AnalyzeArgs {
    /// Plant image to analyze. Falls back to `image_path` in the config file.
    #[arg(long)]
    image: Option<PathBuf>,
    /// Weather description, e.g. "clear sky".
    #[arg(long)]
    weather: Option<String>,
    /// Air temperature in °C.
    #[arg(long, allow_negative_numbers = true)]
    temperature: Option<f64>,
    /// Relative humidity in %.
    #[arg(long)]
    humidity: Option<f64>,
    /// Soil type, e.g. sandy, clay, loamy.
    #[arg(long)]
    soil: Option<String>,
    /// Plant size for the irrigation estimate: small, medium or large.
    #[arg(long)]
    plant_size: Option<String>,
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    format: FormatArg,
}

#[derive(Debug, Args)]
struct DescribeArgs {
    /// Image to describe. Falls back to `image_path` in the config file.
    #[arg(long)]
    image: Option<PathBuf>,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = LeafwatchConfig::load(cli.config.as_deref())?;
    if let Some(backend) = cli.backend {
        config.backend = backend.into();
    }

    match cli.command.unwrap_or_else(|| Command::Analyze(AnalyzeArgs::default())) {
        Command::Analyze(args) => analyze(config, args).await,
        Command::Describe(args) => describe(config, args).await,
    }
}

fn resolve_image(flag: Option<PathBuf>, config: &LeafwatchConfig) -> Result<PathBuf> {
    match flag.or_else(|| config.image_path.clone()) {
        Some(path) => Ok(path),
        None => bail!("no image given: pass --image or set image_path in the config file"),
    }
}

fn build_pipeline(config: &LeafwatchConfig) -> Result<StressPipeline> {
    config.validate()?;
    let backend = backend_from_config(config).context("could not set up the reasoning backend")?;
    let pipeline = StressPipeline::new(
        backend,
        PipelineConfig {
            plant_size: config.plant_size,
        },
    );
    info!(backend = pipeline.backend_name(), "reasoning backend ready");
    Ok(pipeline)
}

async fn analyze(mut config: LeafwatchConfig, args: AnalyzeArgs) -> Result<()> {
    if let Some(size) = args.plant_size.as_deref() {
        config.plant_size = PlantSize::from_name_or_default(size);
    }
    let image_path = resolve_image(args.image.clone(), &config)?;
    let pipeline = build_pipeline(&config)?;

    eprintln!("🔍 Validating image with the {} backend...", pipeline.backend_name());
    let screened = match pipeline.screen_path(&image_path).await {
        Ok(screened) => screened,
        Err(LeafwatchError::NotAPlant { verdict }) => {
            eprintln!("🌿 Model says: {verdict}");
            bail!("not a valid single-plant image");
        }
        Err(e) => return Err(e.into()),
    };
    eprintln!("🌿 Model says: {}", screened.validation);

    let conditions = {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        gather_conditions(&args, &mut input)?
    };

    let report = pipeline.assess(&screened, conditions).await;
    let format = match args.format {
        FormatArg::Text => ReportFormat::Text,
        FormatArg::Json => ReportFormat::Json,
    };
    println!("{}", report.render(format)?);
    Ok(())
}

async fn describe(config: LeafwatchConfig, args: DescribeArgs) -> Result<()> {
    let image_path = resolve_image(args.image, &config)?;
    let pipeline = build_pipeline(&config)?;
    let description = pipeline.describe_path(&image_path).await?;
    println!("🔍 Result: {description}");
    Ok(())
}

/// Fills in whatever the flags left out by prompting on stderr and reading `input`.
fn gather_conditions(args: &AnalyzeArgs, input: &mut impl BufRead) -> Result<GrowingConditions> {
    let needs_prompt =
        args.weather.is_none() || args.temperature.is_none() || args.humidity.is_none() || args.soil.is_none();
    if needs_prompt {
        eprintln!("\n🌦 Please enter the current conditions for this plant:");
    }

    let description = match &args.weather {
        Some(weather) => weather.clone(),
        None => ask(input, "Weather description (e.g., clear sky): ")?,
    };
    let temperature_c = match args.temperature {
        Some(value) => value,
        None => parse_number(&ask(input, "Temperature in °C: ")?, "temperature")?,
    };
    let humidity_pct = match args.humidity {
        Some(value) => value,
        None => parse_number(&ask(input, "Humidity %: ")?, "humidity")?,
    };
    let soil = match &args.soil {
        Some(soil) => soil.clone(),
        None => ask(input, "Soil type (sandy, clay, loamy, etc.): ")?,
    };

    Ok(GrowingConditions {
        weather: WeatherReading {
            description,
            temperature_c,
            humidity_pct,
        },
        soil,
    })
}

fn ask(input: &mut impl BufRead, prompt: &str) -> Result<String> {
    eprint!("{prompt}");
    std::io::stderr().flush().ok();
    let mut line = String::new();
    let read = input.read_line(&mut line).context("could not read from stdin")?;
    if read == 0 {
        bail!("input ended before all conditions were entered");
    }
    Ok(line.trim().to_string())
}

fn parse_number(text: &str, field: &str) -> Result<f64> {
    text.parse::<f64>()
        .with_context(|| format!("{field} must be a number, got '{text}'"))
}
