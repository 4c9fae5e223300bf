// trendly: terminal widget for trending keywords.
// Parses the command line, wires the feed, store and scheduler together, and runs the UI.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use trendly::app::App;
use trendly::cache::{self, FileStore, SnapshotStore};
use trendly::config::Config;
use trendly::error::Result;
use trendly::feed::FeedClient;
use trendly::logging;
use trendly::render::{self, WidgetSize};
use trendly::state::{RefreshOutcome, Refresher, Trigger, scheduler};
use trendly::ui::terminal;

#[derive(Parser, Debug)]
#[command(name = "trendly", version, about = "Trending keywords widget for the terminal")]
struct Cli {
    /// Path to a config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the widget with scheduled refreshes (default)
    Run,
    /// Refresh once, then print the widget
    Refresh(ViewArgs),
    /// Print the stored widget without fetching
    Show(ViewArgs),
}

#[derive(Args, Debug)]
struct ViewArgs {
    /// Widget size (overrides config)
    #[arg(long, value_enum)]
    size: Option<WidgetSize>,

    /// Use the dark palette
    #[arg(long)]
    dark: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Run);

    let log_file = match command {
        Command::Run => cache::paths::log_path(),
        _ => None,
    };
    if let Err(e) = logging::init_logging(cli.quiet, log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = match Config::load(cli.config.as_deref()) {
        Ok(config) => match command {
            Command::Run => run_widget(&config).await,
            Command::Refresh(args) => refresh_once(&config, &args).await,
            Command::Show(args) => show(&config, &args),
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(event = "trendly.failed", error = %e, "trendly exited with an error");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_refresher(config: &Config) -> Result<Refresher<FeedClient, FileStore>> {
    let client = FeedClient::new(
        &config.api_url,
        config.request_timeout(),
        config.accept_invalid_certs,
    )?;
    let store = FileStore::for_group(&config.widget_group)?;
    Ok(Refresher::new(client, store))
}

/// Run the terminal widget until the user quits.
async fn run_widget(config: &Config) -> Result<()> {
    let refresher = Arc::new(build_refresher(config)?);
    let handle = scheduler::spawn(
        refresher.clone(),
        config.refresh_interval(),
        config.refresh_on_start,
    );

    let run_result = terminal::enter().and_then(|(mut terminal, restore)| {
        let mut app = App::new(config.size, config.dark_mode, refresher.subscribe(), &handle);
        let result = app.run(&mut terminal);
        drop(restore);
        result
    });

    handle.shutdown().await;
    run_result?;
    Ok(())
}

/// Run one refresh cycle and print the resulting widget.
async fn refresh_once(config: &Config, args: &ViewArgs) -> Result<()> {
    let refresher = build_refresher(config)?;
    let outcome = refresher.refresh(Trigger::Manual).await;
    match &outcome {
        RefreshOutcome::Updated(count) => eprintln!("Stored {} keywords", count),
        RefreshOutcome::NoEntries => eprintln!("Feed returned no usable keywords"),
        RefreshOutcome::Failed(_) | RefreshOutcome::Skipped => {}
    }

    let view = refresher
        .state()
        .view(view_slots(config, args), config.dark_mode || args.dark);
    print_lines(&render::text::to_lines(&view));
    outcome.into_result()?;
    Ok(())
}

/// Print the stored widget.
fn show(config: &Config, args: &ViewArgs) -> Result<()> {
    let store = FileStore::for_group(&config.widget_group)?;
    let slots = view_slots(config, args);
    let dark_mode = config.dark_mode || args.dark;

    let view = match store.load() {
        Ok(snapshot) => render::render(snapshot.as_ref(), None, slots, dark_mode),
        Err(e) => render::render(None, Some(&e.to_string()), slots, dark_mode),
    };
    print_lines(&render::text::to_lines(&view));
    Ok(())
}

fn view_slots(config: &Config, args: &ViewArgs) -> usize {
    args.size.unwrap_or(config.size).slots()
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
