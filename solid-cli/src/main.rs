use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::Path;

use solid_cli::commands::create::{self, CliCreateOpts};
use solid_cli::commands::{debug, docs, start};
use solid_cli::config::Settings;
use solid_cli::logging;
use solid_cli::prompts::{self, Terminal};
use solid_create::tasks::Spinner;

#[derive(Parser)]
#[command(name = "solid", version, about = "Solid CLI: create and work on Solid projects")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new Solid project
    Create {
        /// Project name (prompted for when omitted)
        name: Option<String>,
        /// Create a SolidStart project
        #[arg(long, short = 's', conflicts_with = "vanilla")]
        start: bool,
        /// Create a plain Solid + Vite project
        #[arg(long, short = 'v')]
        vanilla: bool,
        /// Template name (e.g. basic, ts)
        #[arg(long, short = 't')]
        template: Option<String>,
        /// Convert the template to JavaScript
        #[arg(long, conflicts_with = "ts")]
        js: bool,
        /// Keep the template in TypeScript
        #[arg(long)]
        ts: bool,
        /// Take defaults instead of prompting
        #[arg(long)]
        no_interactive: bool,
    },
    /// Print platform and toolchain versions
    Debug,
    /// SolidStart project helpers
    Start {
        #[command(subcommand)]
        kind: StartKind,
    },
    /// Open the Solid docs in your browser
    Docs,
}

#[derive(Subcommand)]
enum StartKind {
    /// Add a route file under src/routes
    Route {
        /// Route path (e.g. about, blog/[id])
        name: String,
    },
    /// Run the dev server
    Dev,
}

fn main() {
    let cli = Cli::parse();
    println!("\n{}", solid_cli::banner().black().on_cyan());

    if let Err(e) = run(cli) {
        // Backing out of a prompt is not a failure.
        if let Some(message) = prompts::cancellation(&e) {
            eprintln!("{} {}", "!".yellow(), message.yellow());
            std::process::exit(0);
        }
        eprintln!("{}", format!("Error: {e:#}").red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load()?;
    logging::init_tracing(&settings.log);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match cli.command {
        Commands::Create {
            name,
            start,
            vanilla,
            template,
            js,
            ts,
            no_interactive,
        } => {
            let opts = CliCreateOpts {
                name,
                start,
                vanilla,
                template,
                js,
                ts,
                no_interactive,
            };
            let mut spinner = Spinner::new();
            runtime
                .block_on(create::run(opts, &settings, &mut Terminal, &mut spinner))
                .map(drop)
        }
        Commands::Debug => debug::run(),
        Commands::Start { kind } => match kind {
            StartKind::Route { name } => runtime
                .block_on(start::route(Path::new("."), &name))
                .map(drop),
            StartKind::Dev => start::dev(Path::new("."), &settings.package_manager),
        },
        Commands::Docs => docs::run(&settings.docs_url),
    }
}
