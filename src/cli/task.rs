use anyhow::Result;
use clap::Subcommand;
use tracing::instrument;

use crate::{
    history::entities::{TaskSnapshot, TaskStatus},
    tracker::Tracker,
};

use super::{dates::DateArgs, CliContext};

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    #[command(about = "Add an upcoming task")]
    Add {
        #[arg(help = "Title of the task")]
        title: String,
        #[arg(long, short, help = "Planned time, for example 09:30. Tasks are ordered by it")]
        time: Option<String>,
        #[arg(long, short, help = "Free form category, for example work or health")]
        category: Option<String>,
        #[command(flatten)]
        date: DateArgs,
    },
    #[command(about = "Mark a task completed, or upcoming again")]
    Toggle {
        id: u64,
        #[command(flatten)]
        date: DateArgs,
    },
    #[command(about = "Remove a task")]
    Remove {
        id: u64,
        #[command(flatten)]
        date: DateArgs,
    },
    #[command(about = "List the tasks of a day")]
    List {
        #[command(flatten)]
        date: DateArgs,
    },
}

pub fn format_task(task: &TaskSnapshot) -> String {
    let mark = match task.status {
        TaskStatus::Completed => "[x]",
        TaskStatus::Upcoming => "[ ]",
    };
    format!(
        "{}\t{mark} {}\t{}\t{}",
        task.id,
        task.time.as_deref().unwrap_or("--:--"),
        task.title,
        task.category.as_deref().unwrap_or("")
    )
}

#[instrument(skip(context))]
pub async fn process_task_command(context: &CliContext, command: TaskCommand) -> Result<()> {
    let today = context.clock.today();
    let tracker = Tracker::new(&context.repository);

    match command {
        TaskCommand::Add {
            title,
            time,
            category,
            date,
        } => {
            let mut plan = tracker.open(date.resolve(today)?).await?;
            let id = plan.add_task(&title, time.as_deref(), category.as_deref())?;
            let record = tracker.commit(&plan).await?;
            println!(
                "Added task {id} to {} ({}/{})",
                record.date(),
                record.completed(),
                record.total()
            );
        }
        TaskCommand::Toggle { id, date } => {
            let mut plan = tracker.open(date.resolve(today)?).await?;
            let status = plan.toggle_task(id)?;
            let record = tracker.commit(&plan).await?;
            println!(
                "Task {id} is now {} ({} day)",
                match status {
                    TaskStatus::Completed => "completed",
                    TaskStatus::Upcoming => "upcoming",
                },
                record.status()
            );
        }
        TaskCommand::Remove { id, date } => {
            let mut plan = tracker.open(date.resolve(today)?).await?;
            let removed = plan.remove_task(id)?;
            tracker.commit(&plan).await?;
            println!("Removed \"{}\"", removed.title);
        }
        TaskCommand::List { date } => {
            let plan = tracker.open(date.resolve(today)?).await?;
            if plan.tasks().is_empty() {
                println!("No tasks on {}", plan.date());
            }
            for task in plan.tasks() {
                println!("{}", format_task(task));
            }
        }
    }
    Ok(())
}
