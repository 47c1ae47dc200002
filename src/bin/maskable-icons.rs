use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use maskable_icons::{
    generate_any_icon_set, inspect_directory, Background, GenerationMode, GenerationReport,
    IconProfile, IconTarget, OutputTemplate, SquareMode, DEFAULT_FILE_NAME,
};

#[derive(Debug, Parser)]
#[command(
    name = "maskable-icons",
    about = "Generate maskable web-app icons from a single logo",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate one opaque PNG icon per size.
    Generate(GenerateArgs),

    /// Generate the transparent "any"-purpose icons (192, 512, apple 180).
    Any {
        /// Source logo.
        #[arg(value_name = "SOURCE")]
        source: PathBuf,

        /// Output directory.
        #[arg(short, long, value_name = "DIR", default_value = "public")]
        output: PathBuf,
    },

    /// List the dimensions and color mode of every image in a directory.
    Inspect {
        /// Directory to inspect.
        #[arg(value_name = "DIR", default_value = "public")]
        dir: PathBuf,

        /// File extension to include.
        #[arg(long, default_value = "png")]
        ext: String,
    },
}

#[derive(Debug, clap::Args)]
struct GenerateArgs {
    /// Source logo (PNG, or SVG rendered at the largest size).
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Output directory.
    #[arg(short, long, value_name = "DIR", default_value = "public")]
    output: PathBuf,

    /// Output path pattern; overrides --output. Must contain {size}.
    #[arg(long, value_name = "TEMPLATE")]
    template: Option<String>,

    /// Icon sizes to generate.
    #[arg(short, long, value_delimiter = ',', default_value = "192,512")]
    sizes: Vec<u32>,

    /// Preset layout: crop + 80% safe zone, or pad + edge-to-edge.
    #[arg(short, long, value_enum, default_value_t = GenerationMode::SafeZone)]
    mode: GenerationMode,

    /// Override the preset's squaring strategy.
    #[arg(long, value_enum)]
    square: Option<SquareMode>,

    /// Override the preset's safe-zone ratio, in (0, 1].
    #[arg(long)]
    ratio: Option<f64>,

    /// Background color as hex, e.g. "#ffffff".
    #[arg(short, long, default_value = "#ffffff")]
    background: Background,

    /// Print the resolved settings as JSON before generating.
    #[arg(long)]
    print_profile: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => generate(args),
        Command::Any { source, output } => any(source, output),
        Command::Inspect { dir, ext } => inspect(dir, &ext),
    }
}

impl GenerateArgs {
    /// The preset for `--mode` with the explicit overrides applied.
    fn profile(&self) -> IconProfile {
        let mut profile = self
            .mode
            .profile()
            .with_sizes(self.sizes.clone())
            .with_background(self.background);
        if let Some(square) = self.square {
            profile = profile.with_square_mode(square);
        }
        if let Some(ratio) = self.ratio {
            profile = profile.with_safe_ratio(ratio);
        }
        profile
    }
}

fn summary_line(profile: &IconProfile) -> String {
    format!(
        "Generated maskable icons ({}, ratio {}, {} background):",
        profile.square_mode, profile.safe_ratio, profile.background
    )
}

fn print_report(report: &GenerationReport) -> ExitCode {
    for icon in &report.written {
        println!("  {}", icon.path.display());
    }
    for failure in &report.failed {
        println!("  {} FAILED: {}", failure.path.display(), failure.error);
    }

    if report.is_complete() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn generate(args: GenerateArgs) -> ExitCode {
    let profile = args.profile();

    if args.print_profile {
        match profile.to_json_pretty() {
            Ok(json) => println!("{}", json),
            Err(e) => log::warn!("cannot print profile: {}", e),
        }
    }

    let template = match args.template {
        Some(template) => match OutputTemplate::new(template) {
            Ok(template) => template,
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => OutputTemplate::in_dir(&args.output),
    };

    let report = match profile.generate(&args.source, &template) {
        Ok(report) => report,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("{}", summary_line(&profile));
    print_report(&report)
}

fn any(source: PathBuf, output: PathBuf) -> ExitCode {
    match generate_any_icon_set(&source, &IconTarget::standard_any(&output)) {
        Ok(report) => {
            println!("Generated any-purpose icons:");
            print_report(&report)
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn inspect(dir: PathBuf, ext: &str) -> ExitCode {
    match inspect_directory(&dir, ext) {
        Ok(entries) => {
            for entry in entries {
                println!("{}", entry);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
