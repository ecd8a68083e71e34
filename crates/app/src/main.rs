use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use threesixty_core::{
    generate_levels, AppConfig, BeatmapDocument, ConfigSource, Handedness, JsonConfigFile,
    RotationMode,
};
use tracing_subscriber::EnvFilter;

fn main() -> threesixty_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output,
            config,
            left_handed,
            mode,
        } => run_generate(&input, &output, config, left_handed, mode),
        Commands::Defaults => run_defaults(),
        Commands::CheckDefaults { config, mode } => run_check_defaults(config, mode),
    }
}

fn run_generate(
    input: &PathBuf,
    output: &PathBuf,
    config: Option<PathBuf>,
    left_handed: bool,
    mode: Option<ModeArg>,
) -> threesixty_core::Result<()> {
    tracing::info!(?input, ?output, "generating rotating levels");

    let mut config = load_config(config)?;
    if let Some(mode) = mode {
        config.levels.show_360_degree = matches!(mode, ModeArg::Both | ModeArg::Degree360);
        config.levels.show_90_degree = matches!(mode, ModeArg::Both | ModeArg::Degree90);
    }
    let handedness = if left_handed {
        Handedness::Left
    } else {
        Handedness::Right
    };

    let source = BeatmapDocument::load(input)?;
    let mut document = source.clone();
    let modes = generate_levels(&source, &mut document, &config, handedness)?;
    if modes.is_empty() {
        tracing::warn!("no level mode enabled, nothing generated");
    }

    document.save(output)?;
    Ok(())
}

fn run_defaults() -> threesixty_core::Result<()> {
    let json = serde_json::to_string_pretty(&AppConfig::default())?;
    println!("{json}");
    Ok(())
}

fn run_check_defaults(config: Option<PathBuf>, mode: ModeArg) -> threesixty_core::Result<()> {
    let config = load_config(config)?;
    let modes: &[RotationMode] = match mode {
        ModeArg::Degree360 => &[RotationMode::Degree360],
        ModeArg::Degree90 => &[RotationMode::Degree90],
        ModeArg::Both => &[RotationMode::Degree360, RotationMode::Degree90],
    };
    for &mode in modes {
        println!(
            "{}: {}",
            mode.characteristic(),
            if config.settings_are_default(mode) {
                "default"
            } else {
                "modified"
            }
        );
    }
    Ok(())
}

fn load_config(path: Option<PathBuf>) -> threesixty_core::Result<AppConfig> {
    match path {
        Some(path) => JsonConfigFile::new(path).load_config(),
        None => Ok(AppConfig::default()),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Generates rotating 360/90 degree levels", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    #[value(name = "360")]
    Degree360,
    #[value(name = "90")]
    Degree90,
    Both,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate rotating levels from a beatmap document.
    Generate {
        /// Beatmap document holding the base level.
        input: PathBuf,
        /// Where to write the document with the generated levels added.
        output: PathBuf,
        /// JSON configuration file. Defaults are used when omitted.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Keep the left hand's color in single saber mode.
        #[arg(long)]
        left_handed: bool,
        /// Override which levels are generated.
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,
    },
    /// Print the default configuration as JSON.
    Defaults,
    /// Report whether the settings for a mode are untouched.
    CheckDefaults {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long, value_enum, default_value = "both")]
        mode: ModeArg,
    },
}
