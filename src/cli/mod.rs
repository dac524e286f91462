pub mod dates;
pub mod insights;
pub mod output;
pub mod task;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use insights::{process_insights_command, InsightsCommand};
use task::{process_task_command, TaskCommand};

use crate::{
    history::repository::GenericHistoryRepository,
    utils::{
        clock::{Clock, DefaultClock},
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, LogOptions},
    },
};

#[derive(Parser, Debug)]
#[command(name = "DayMaker", version, long_about = None)]
#[command(about = "Day tracker with a yearly activity calendar and completion insights", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        global = true,
        env = "DAYMAKER_DIR",
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "DAYMAKER_USER",
        help = "Use the history of a signed in user instead of the anonymous one"
    )]
    user: Option<String>,
    #[arg(long, global = true, help = "Disable colors")]
    plain: bool,
    #[arg(long, global = true, help = "Enable logging")]
    log: bool,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(flatten)]
    Insights(InsightsCommand),
    #[command(about = "Edit the tasks of a day")]
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
}

/// Everything a command needs: where the history lives and what day it is.
pub struct CliContext {
    pub repository: GenericHistoryRepository,
    pub clock: Box<dyn Clock>,
    pub colored: bool,
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = match args.dir {
        Some(dir) => ensure_dir(dir)?,
        None => create_application_default_path()?,
    };

    enable_logging(&app_dir, LogOptions::from_flag(args.log))?;

    let context = CliContext {
        repository: GenericHistoryRepository::for_user(&app_dir, args.user.as_deref())?,
        clock: Box::new(DefaultClock),
        colored: !args.plain,
    };

    match args.commands {
        Commands::Insights(command) => process_insights_command(&context, command).await,
        Commands::Task { command } => process_task_command(&context, command).await,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::Args;

    #[test]
    fn cli_definition_is_valid() {
        Args::command().debug_assert();
    }
}
