use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use lproj_tts::AudioEncoding;
use lproj_tts_cli::{
    GenerateSettings, GenerationArgs,
    embed::{EmbedArgs, run_embed_command},
    generate::run_generate_command,
    load_config,
    view::run_view_command,
    voices::run_voices_command,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lproj-tts", author, version, about, long_about = None)]
struct Args {
    /// Config file (defaults to ./lproj-tts.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log HTTP and file operations
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Synthesize one audio file per entry of each language's strings table.
    Generate {
        #[command(flatten)]
        args: GenerationArgs,
    },

    /// Generate, then copy the audio into the app's resources and commit it.
    Embed {
        #[command(flatten)]
        args: EmbedArgs,
    },

    /// List the voices offered by the speech provider.
    Voices {
        /// Only voices for this locale (e.g. ja-JP)
        #[arg(short, long)]
        lang: Option<String>,

        /// Google Cloud project id
        #[arg(long)]
        project: Option<String>,
    },

    /// Show the entries of a strings file and the audio file names they map to.
    View {
        /// The strings file to view
        #[arg(short, long)]
        input: String,

        /// Language used for suffixed names (inferred from the .lproj folder otherwise)
        #[arg(short, long)]
        lang: Option<String>,

        /// Audio encoding used for file extensions
        #[arg(long, default_value = "mp3")]
        encoding: AudioEncoding,

        /// Display full value without truncation
        #[arg(long)]
        full: bool,
    },

    /// Print a shell completion script.
    Completions {
        shell: Shell,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = if verbose {
        EnvFilter::new(default)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<(), String> {
    match args.commands {
        Commands::Generate { args: generation } => {
            let config = load_config(args.config.as_deref())?;
            let settings = GenerateSettings::resolve(&generation, &config)?;
            run_generate_command(
                &settings,
                generation.report_json.as_deref(),
                generation.strict,
            )
        }
        Commands::Embed { args: embed } => {
            let config = load_config(args.config.as_deref())?;
            run_embed_command(&embed, &config)
        }
        Commands::Voices { lang, project } => {
            let config = load_config(args.config.as_deref())?;
            run_voices_command(lang.as_deref(), project.or(config.project))
        }
        Commands::View {
            input,
            lang,
            encoding,
            full,
        } => run_view_command(&input, lang.as_deref(), encoding, full),
        Commands::Completions { shell } => {
            let mut cmd = Args::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
