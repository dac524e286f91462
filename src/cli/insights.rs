use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use clap::Subcommand;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{
    history::{
        entities::{History, HistorySnapshot, TaskSnapshot},
        repository::HistoryRepository,
    },
    insights::{
        cache::InsightsCache,
        grid::{day_grade, DayTooltip},
        series::{monthly_series, shift_weeks, weekly_series},
        stats::{available_years, completion_percentage, lifetime_completed},
    },
};

use super::{
    dates::DateArgs,
    output::{
        charts::{render_monthly, render_stats, render_weekly},
        heatmap::render_heatmap,
        Palette,
    },
    CliContext,
};

#[derive(Subcommand, Debug)]
pub enum InsightsCommand {
    #[command(about = "Display the activity calendar of a year")]
    Calendar {
        #[arg(long, short, help = "Year to display. Defaults to the current one")]
        year: Option<i32>,
    },
    #[command(about = "Display completion statistics of a year")]
    Stats {
        #[arg(long, short, help = "Year to display. Defaults to the current one")]
        year: Option<i32>,
        #[arg(long, help = "Print as json")]
        json: bool,
    },
    #[command(about = "Display completed tasks for each day of a week")]
    Week {
        #[command(flatten)]
        date: DateArgs,
        #[arg(
            long,
            short,
            default_value_t = 0,
            allow_negative_numbers = true,
            help = "Move by whole weeks from the selected date, -1 is the previous week"
        )]
        offset: i64,
        #[arg(long, help = "Print as json")]
        json: bool,
    },
    #[command(about = "Display day counts and completed tasks for each month of a year")]
    Months {
        #[arg(long, short, help = "Year to display. Defaults to the current one")]
        year: Option<i32>,
        #[arg(long, help = "Print as json")]
        json: bool,
    },
    #[command(about = "Display a single day")]
    Day {
        #[command(flatten)]
        date: DateArgs,
        #[arg(long, help = "Print as json")]
        json: bool,
    },
    #[command(about = "List years that have recorded activity")]
    Years,
}

/// Summary of a day as shown in the day detail view.
#[derive(Debug, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub tooltip: DayTooltip,
    pub grade: &'static str,
    pub completion_percent: u32,
    pub tasks: Vec<TaskSnapshot>,
}

impl DayView {
    pub fn new(history: &History, date: NaiveDate) -> Self {
        let record = history.get(&date);
        Self {
            date,
            tooltip: DayTooltip::describe(date, record),
            grade: day_grade(record),
            completion_percent: record.map_or(0, |r| completion_percentage(r).rounded()),
            tasks: record.map(|r| r.tasks().to_vec()).unwrap_or_default(),
        }
    }
}

#[instrument(skip(context))]
pub async fn process_insights_command(context: &CliContext, command: InsightsCommand) -> Result<()> {
    let history = context.repository.load_history().await?;
    debug!("Loaded history with {} days", history.len());
    let snapshot = HistorySnapshot::new(1, history);
    let today = context.clock.today();
    let palette = Palette {
        colored: context.colored,
    };
    let cache = InsightsCache::new();

    match command {
        InsightsCommand::Calendar { year } => {
            let insights = cache.get(&snapshot, year.unwrap_or(today.year()));
            println!(
                "{}",
                render_heatmap(&insights.grid, &insights.month_labels, palette)
            );
            println!(
                "{} active days, longest streak {} days",
                insights.stats.active_days, insights.stats.max_streak
            );
        }
        InsightsCommand::Stats { year, json } => {
            let insights = cache.get(&snapshot, year.unwrap_or(today.year()));
            if json {
                #[derive(Serialize)]
                struct StatsOutput<'a> {
                    year: i32,
                    stats: &'a crate::insights::stats::YearStats,
                    pie: &'a [crate::insights::pie::PieSlice],
                    lifetime_completed: u64,
                }
                println!(
                    "{}",
                    serde_json::to_string_pretty(&StatsOutput {
                        year: insights.year,
                        stats: &insights.stats,
                        pie: &insights.pie,
                        lifetime_completed: lifetime_completed(snapshot.records()),
                    })?
                );
            } else {
                print!(
                    "{}",
                    render_stats(insights.year, &insights.stats, &insights.pie, palette)
                );
                println!(
                    "Lifetime\t{} tasks",
                    lifetime_completed(snapshot.records())
                );
            }
        }
        InsightsCommand::Week { date, offset, json } => {
            let reference = shift_weeks(date.resolve(today)?, offset);
            let series = weekly_series(snapshot.records(), reference);
            if json {
                println!("{}", serde_json::to_string_pretty(&series)?);
            } else {
                print!("{}", render_weekly(&series, palette));
            }
        }
        InsightsCommand::Months { year, json } => {
            let series = monthly_series(snapshot.records(), year.unwrap_or(today.year()));
            if json {
                println!("{}", serde_json::to_string_pretty(&series)?);
            } else {
                print!("{}", render_monthly(&series, palette));
            }
        }
        InsightsCommand::Day { date, json } => {
            let view = DayView::new(snapshot.records(), date.resolve(today)?);
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_day(&view);
            }
        }
        InsightsCommand::Years => {
            for year in available_years(snapshot.records(), today) {
                println!("{year}");
            }
        }
    }
    Ok(())
}

fn print_day(view: &DayView) {
    println!("{}", view.tooltip.date);
    println!(
        "{}\t{}\tgrade {}\t{}%",
        view.tooltip.status_text, view.tooltip.details, view.grade, view.completion_percent
    );
    for task in &view.tasks {
        println!("{}", super::task::format_task(task));
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use crate::{
        cli::{
            dates::{DateArgs, DateStyle},
            CliContext,
        },
        history::{
            entities::{DailyRecord, History, TaskSnapshot, TaskStatus},
            repository::{GenericHistoryRepository, HistoryRepository},
        },
        utils::clock::MockClock,
    };

    use super::{process_insights_command, DayView, InsightsCommand};

    #[tokio::test]
    async fn every_view_renders() -> Result<()> {
        let dir = tempdir()?;
        let mut clock = MockClock::new();
        clock
            .expect_today()
            .returning(|| NaiveDate::from_ymd_opt(2026, 3, 14).unwrap());
        let context = CliContext {
            repository: GenericHistoryRepository::for_user(dir.path(), None)?,
            clock: Box::new(clock),
            colored: true,
        };
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        context
            .repository
            .save_daily_record(&DailyRecord::from_counts(date, 3, 1))
            .await?;

        let commands = vec![
            InsightsCommand::Calendar { year: None },
            InsightsCommand::Stats { year: Some(2026), json: true },
            InsightsCommand::Stats { year: Some(2027), json: false },
            InsightsCommand::Week {
                date: DateArgs {
                    date: Some("2026-03-02".into()),
                    date_style: DateStyle::Uk,
                },
                offset: -1,
                json: false,
            },
            InsightsCommand::Months { year: None, json: true },
            InsightsCommand::Day {
                date: DateArgs {
                    date: None,
                    date_style: DateStyle::Us,
                },
                json: false,
            },
            InsightsCommand::Years,
        ];
        for command in commands {
            process_insights_command(&context, command).await?;
        }
        Ok(())
    }

    #[test]
    fn day_view_of_recorded_and_empty_days() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let mut history = History::new();
        history.insert(
            date,
            DailyRecord::from_tasks(
                date,
                vec![TaskSnapshot {
                    id: 1,
                    title: "Run".into(),
                    status: TaskStatus::Completed,
                    time: None,
                    category: None,
                }],
            ),
        );

        let view = DayView::new(&history, date);
        assert_eq!(view.grade, "A+");
        assert_eq!(view.completion_percent, 100);
        assert_eq!(view.tasks.len(), 1);
        assert_eq!(view.tooltip.status_text, "Perfect");

        let empty = DayView::new(&history, date.succ_opt().unwrap());
        assert_eq!(empty.grade, "N/A");
        assert_eq!(empty.completion_percent, 0);
        assert!(empty.tasks.is_empty());
    }
}
