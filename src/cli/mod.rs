pub mod commands;
pub mod confirm;
pub mod stats;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;

use crate::{
    storage::tracker_storage::TrackerStorageImpl,
    utils::{dir::create_application_default_path, logging::enable_logging},
};

use commands::DateInput;
use confirm::StdinConfirmer;

#[derive(Parser, Debug)]
#[command(name = "Metrack", version, long_about = None)]
#[command(about = "Track personal metrics from the command line", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Add a value onto a tracker for a given day")]
    Update {
        #[arg(help = "Name of the tracker")]
        tracker: String,
        #[arg(help = "Value to add. Merges with the value already recorded for that day")]
        value: f64,
        #[command(flatten)]
        date: DateInput,
    },
    #[command(about = "List all known trackers")]
    List {},
    #[command(about = "Display every record of a tracker")]
    Show {
        #[arg(help = "Name of the tracker")]
        tracker: String,
    },
    #[command(about = "Delete a tracker together with all of its records")]
    Delete {
        #[arg(help = "Name of the tracker")]
        tracker: String,
    },
    #[command(about = "Display weekday statistics for a tracker")]
    Stats {
        #[arg(help = "Name of the tracker")]
        tracker: String,
    },
    #[command(about = "Plot a tracker through gnuplot")]
    Plot {
        #[arg(help = "Name of the tracker")]
        tracker: String,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let application_path = create_application_default_path()?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(&application_path, logging_level, args.log)?;

    let storage = TrackerStorageImpl::new(application_path.join("records"))?;

    match args.commands {
        Commands::Update {
            tracker,
            value,
            date,
        } => {
            commands::process_update_command(&storage, &mut StdinConfirmer, &tracker, value, date)
                .await
        }
        Commands::List {} => commands::process_list_command(&storage).await,
        Commands::Show { tracker } => commands::process_show_command(&storage, &tracker).await,
        Commands::Delete { tracker } => {
            commands::process_delete_command(&storage, &mut StdinConfirmer, &tracker).await
        }
        Commands::Stats { tracker } => stats::process_stats_command(&storage, &tracker).await,
        Commands::Plot { tracker } => commands::process_plot_command(&storage, &tracker).await,
    }
}
