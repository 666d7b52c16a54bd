use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use momentum::api::{ApiClient, ApiError};
use momentum::config::{Config, DEFAULT_API_URL};
use momentum::poll::{RemoteScheduleSource, RunningTaskPoller, Watched};
use momentum::sync;
use momentum_core::breadcrumb::GoalNavigator;
use momentum_core::models::{
    ActivityStatus, CreateGoalInput, CreateRoutineInput, CreateSubGoalInput, Goal, Routine,
    SubGoal, Task, TaskStatus, UserProfile,
};
use momentum_core::projection::{sort_by_schedule, tasks_for_goal, tasks_for_routine};
use momentum_core::tracker::{TrackerConfig, TrackerEvent, TrackerMode, WorkTracker};
use momentum_core::Database;

#[derive(Parser)]
#[command(name = "mtm")]
#[command(about = "Goals, routines and focus tracking from the terminal")]
struct Cli {
    /// Backend origin, e.g. https://momentum.example.com
    #[arg(long, global = true, env = "MOMENTUM_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Local store (token, cached profile)
    #[arg(long, global = true, env = "MOMENTUM_DB")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Goals and their sub-goal trees
    Goals {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Routines, sub-routines and activities
    Routines {
        #[command(subcommand)]
        command: RoutineCommands,
    },
    /// List the schedulable tasks of a goal or routine
    Tasks {
        #[command(subcommand)]
        source: TaskSourceArg,
    },
    /// Manage the stored bearer token
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Follow the task scheduled right now
    Watch {
        #[command(subcommand)]
        source: TaskSourceArg,

        /// Seconds between polls
        #[arg(short, long, default_value = "5")]
        interval: u64,
    },
    /// Run a focus timer
    Track {
        /// Pomodoro cycle instead of a plain stopwatch
        #[arg(short, long)]
        pomodoro: bool,

        /// Work phase in minutes
        #[arg(long, default_value = "25", value_parser = minutes())]
        work: u32,

        /// Short break in minutes
        #[arg(long, default_value = "5", value_parser = minutes())]
        short_break: u32,

        /// Long break in minutes
        #[arg(long, default_value = "15", value_parser = minutes())]
        long_break: u32,
    },
}

#[derive(Subcommand)]
enum GoalCommands {
    List,
    Show {
        id: u64,
    },
    Create {
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: u64,
    },
    /// Add a sub-goal to a goal, or below another sub-goal with --parent
    AddSub {
        goal_id: u64,
        title: String,
        #[arg(long)]
        parent: Option<u64>,
        /// Minutes
        #[arg(long)]
        duration: Option<u32>,
    },
    /// Mark a sub-goal completed and write back the new progress
    Complete {
        goal_id: u64,
        sub_goal_id: u64,
        #[arg(long)]
        undo: bool,
    },
    RemoveSub {
        goal_id: u64,
        sub_goal_id: u64,
    },
    /// Print the breadcrumb trail down to a sub-goal
    Path {
        goal_id: u64,
        sub_goal_id: u64,
    },
}

#[derive(Subcommand)]
enum RoutineCommands {
    List,
    Show {
        id: u64,
    },
    Create {
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: u64,
    },
    /// Mark an activity done and write back sub-routine progress
    Done {
        routine_id: u64,
        sub_routine_id: u64,
        activity_id: u64,
        #[arg(long)]
        undo: bool,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum TaskSourceArg {
    Goal { id: u64 },
    Routine { id: u64 },
}

#[derive(Subcommand)]
enum AuthCommands {
    SetToken {
        token: String,
        /// JSON file holding the user object returned at sign-in
        #[arg(long)]
        profile: Option<PathBuf>,
    },
    Clear,
    Status,
}

/// Phase lengths are whole minutes, at most a day.
fn minutes() -> clap::builder::RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(1..=24 * 60)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "momentum=info,momentum_core=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        match e.downcast_ref::<ApiError>() {
            Some(api) => {
                tracing::debug!(error = %api, "command failed");
                eprintln!("error: {}", api.user_message());
            }
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let db = match &cli.db {
        Some(path) => Database::open(path)?,
        None => Database::open_default()?,
    };
    db.migrate()?;

    let config = Config::new(&cli.api_url)?.with_db_path(cli.db.clone());
    let client = ApiClient::new(&config, Arc::new(db.clone()));

    match cli.command {
        Commands::Goals { command } => goals(&client, command).await?,
        Commands::Routines { command } => routines(&client, command).await?,
        Commands::Tasks { source } => {
            let mut tasks = load_tasks(&client, source).await?;
            sort_by_schedule(&mut tasks);
            for task in &tasks {
                print_task(task);
            }
        }
        Commands::Auth { command } => match command {
            AuthCommands::SetToken { token, profile } => {
                db.set_token(token.trim())?;
                if let Some(path) = profile {
                    let raw = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    let profile: UserProfile = serde_json::from_str(&raw)
                        .with_context(|| format!("parsing profile in {}", path.display()))?;
                    db.set_user_profile(&profile)?;
                }
                println!("Token saved.");
            }
            AuthCommands::Clear => {
                db.clear_session()?;
                println!("Signed out.");
            }
            AuthCommands::Status => match (db.token()?, db.user_profile()?) {
                (Some(_), Some(profile)) => println!("Signed in as {} <{}>", profile.name, profile.email),
                (Some(_), None) => println!("Token stored."),
                (None, _) => println!("Not signed in."),
            },
        },
        Commands::Watch { source, interval } => {
            let watched = match source {
                TaskSourceArg::Goal { id } => Watched::Goal(id),
                TaskSourceArg::Routine { id } => Watched::Routine(id),
            };
            let config = config.with_poll_interval(Duration::from_secs(interval.max(1)));
            watch(&client, watched, config.poll_interval).await?;
        }
        Commands::Track {
            pomodoro,
            work,
            short_break,
            long_break,
        } => {
            let mode = if pomodoro {
                TrackerMode::Pomodoro
            } else {
                TrackerMode::Timer
            };
            let config = TrackerConfig {
                work_secs: work * 60,
                short_break_secs: short_break * 60,
                long_break_secs: long_break * 60,
                ..TrackerConfig::default()
            };
            track(WorkTracker::new(mode, config)).await?;
        }
    }

    Ok(())
}

async fn goals(client: &ApiClient, command: GoalCommands) -> anyhow::Result<()> {
    match command {
        GoalCommands::List => {
            for goal in client.list_goals().await? {
                println!(
                    "{:>5}  {:>3}%  {} ({} sub-goals)",
                    goal.id,
                    goal.progress,
                    goal.title,
                    goal.sub_goals_count()
                );
            }
        }
        GoalCommands::Show { id } => {
            let mut goal = client.get_goal(id).await?;
            sync::sync_goal(&mut goal, client).await;
            print_goal(&goal);
        }
        GoalCommands::Create { title, description } => {
            let goal = client
                .create_goal(&CreateGoalInput {
                    title,
                    description,
                    ..Default::default()
                })
                .await?;
            println!("Created goal {}", goal.id);
        }
        GoalCommands::Delete { id } => {
            client.delete_goal(id).await?;
            println!("Deleted goal {}", id);
        }
        GoalCommands::AddSub {
            goal_id,
            title,
            parent,
            duration,
        } => {
            let input = CreateSubGoalInput {
                title,
                duration,
                ..Default::default()
            };
            let created = match parent {
                Some(parent_id) => client.create_nested_sub_goal(parent_id, &input).await?,
                None => client.create_sub_goal(goal_id, &input).await?,
            };
            println!("Created sub-goal {}", created.id);

            let mut goal = client.get_goal(goal_id).await?;
            sync::sync_goal(&mut goal, client).await;
            print_goal(&goal);
        }
        GoalCommands::Complete {
            goal_id,
            sub_goal_id,
            undo,
        } => {
            let mut goal = client.get_goal(goal_id).await?;
            let report = sync::set_sub_goal_completed(client, &mut goal, sub_goal_id, !undo)
                .await?
                .ok_or_else(|| anyhow!("sub-goal {} is not part of goal {}", sub_goal_id, goal_id))?;
            if report.failed > 0 {
                eprintln!("warning: {} progress update(s) were not saved", report.failed);
            }
            print_goal(&goal);
        }
        GoalCommands::RemoveSub {
            goal_id,
            sub_goal_id,
        } => {
            let mut goal = client.get_goal(goal_id).await?;
            if goal.find_sub_goal(sub_goal_id).is_none() {
                bail!("sub-goal {} is not part of goal {}", sub_goal_id, goal_id);
            }
            client.delete_sub_goal(sub_goal_id).await?;
            goal.remove_sub_goal(sub_goal_id);
            sync::sync_goal(&mut goal, client).await;
            print_goal(&goal);
        }
        GoalCommands::Path {
            goal_id,
            sub_goal_id,
        } => {
            let goal = client.get_goal(goal_id).await?;
            let path: Vec<u64> = goal
                .path_to(sub_goal_id)
                .ok_or_else(|| anyhow!("sub-goal {} is not part of goal {}", sub_goal_id, goal_id))?
                .iter()
                .map(|sg| sg.id)
                .collect();

            let mut nav = GoalNavigator::new(goal);
            for id in &path {
                if nav.drill_into(*id).is_err() {
                    break;
                }
            }

            let mut trail = vec!["Home".to_string()];
            trail.extend(nav.breadcrumbs().entries().iter().map(|c| c.title.clone()));
            trail.push(nav.current_title().to_string());
            if let Some(target) = nav.current_children().iter().find(|c| c.id == sub_goal_id) {
                trail.push(target.title.clone());
            }
            println!("{}", trail.join(" › "));
        }
    }
    Ok(())
}

async fn routines(client: &ApiClient, command: RoutineCommands) -> anyhow::Result<()> {
    match command {
        RoutineCommands::List => {
            for routine in client.list_routines().await? {
                println!("{:>5}  {:>3}%  {}", routine.id, routine.progress, routine.title);
            }
        }
        RoutineCommands::Show { id } => {
            let mut routine = client.get_routine(id).await?;
            sync::sync_routine(&mut routine, client).await;
            print_routine(&routine);
        }
        RoutineCommands::Create { title, description } => {
            let routine = client
                .create_routine(&CreateRoutineInput {
                    title,
                    description,
                    ..Default::default()
                })
                .await?;
            println!("Created routine {}", routine.id);
        }
        RoutineCommands::Delete { id } => {
            client.delete_routine(id).await?;
            println!("Deleted routine {}", id);
        }
        RoutineCommands::Done {
            routine_id,
            sub_routine_id,
            activity_id,
            undo,
        } => {
            let status = if undo {
                ActivityStatus::Pending
            } else {
                ActivityStatus::Completed
            };
            let mut routine = client.get_routine(routine_id).await?;
            let report = sync::set_activity_status(
                client,
                &mut routine,
                sub_routine_id,
                activity_id,
                status,
            )
            .await?
            .ok_or_else(|| {
                anyhow!("activity {} not found in sub-routine {}", activity_id, sub_routine_id)
            })?;
            if report.failed > 0 {
                eprintln!("warning: {} progress update(s) were not saved", report.failed);
            }
            print_routine(&routine);
        }
    }
    Ok(())
}

async fn load_tasks(client: &ApiClient, source: TaskSourceArg) -> anyhow::Result<Vec<Task>> {
    Ok(match source {
        TaskSourceArg::Goal { id } => tasks_for_goal(&client.get_goal(id).await?),
        TaskSourceArg::Routine { id } => tasks_for_routine(&client.get_routine(id).await?),
    })
}

async fn watch(client: &ApiClient, watched: Watched, every: Duration) -> anyhow::Result<()> {
    let poller = RunningTaskPoller::spawn(RemoteScheduleSource::new(client.clone(), watched), every);
    let mut updates = poller.subscribe();
    println!("Watching for the current task, ctrl-c to stop.");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                match updates.borrow_and_update().as_ref() {
                    Some(task) => print_task(task),
                    None => println!("Nothing scheduled right now."),
                }
            }
        }
    }

    poller.stop().await;
    Ok(())
}

async fn track(mut tracker: WorkTracker) -> anyhow::Result<()> {
    let mut ticks = tokio::time::interval(Duration::from_secs(1));
    tracker.start();
    println!("Tracking ({:?}), ctrl-c to stop.", tracker.mode());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticks.tick() => {
                if let Some(TrackerEvent::PhaseFinished { finished, next }) = tracker.tick() {
                    println!("{} finished, starting {}", finished.as_str(), next.as_str());
                }
            }
        }
    }

    println!(
        "Tracked {} min, {} work session(s) completed.",
        tracker.elapsed_secs() / 60,
        tracker.completed_sessions()
    );
    Ok(())
}

fn print_goal(goal: &Goal) {
    println!("{}: {}% ({} sub-goals)", goal.title, goal.progress, goal.sub_goals_count());
    print_sub_goals(&goal.sub_goals, 1);
}

fn print_sub_goals(nodes: &[SubGoal], depth: usize) {
    for node in nodes {
        let mark = if node.completed { "x" } else { " " };
        println!(
            "{}[{}] {:>5}  {} ({}%)",
            "  ".repeat(depth),
            mark,
            node.id,
            node.title,
            node.progress
        );
        print_sub_goals(&node.sub_goals, depth + 1);
    }
}

fn print_routine(routine: &Routine) {
    println!("{}: {}%", routine.title, routine.progress);
    for sub_routine in &routine.sub_routines {
        println!("  {:>5}  {} ({}%)", sub_routine.id, sub_routine.title, sub_routine.progress);
        for activity in &sub_routine.activities {
            let mark = if activity.is_completed() { "x" } else { " " };
            println!("    [{}] {:>5}  {}", mark, activity.id, activity.title);
        }
    }
}

fn print_task(task: &Task) {
    let when = match (task.scheduled_date, task.scheduled_time) {
        (Some(d), Some(t)) => format!("{} {}", d, t.format("%H:%M")),
        (Some(d), None) => d.to_string(),
        (None, Some(t)) => t.format("%H:%M").to_string(),
        (None, None) => "unscheduled".to_string(),
    };
    let mark = if task.status == TaskStatus::Completed { "x" } else { " " };
    println!(
        "[{}] {:<16} {:<6} {} ({})",
        mark,
        when,
        task.priority.as_str(),
        task.title,
        task.parent_title
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_accepts_phase_lengths_up_to_a_day() {
        let cli = Cli::try_parse_from(["mtm", "track", "--pomodoro", "--work", "1440"]).unwrap();
        assert!(matches!(cli.command, Commands::Track { work: 1440, pomodoro: true, .. }));
    }

    #[test]
    fn track_rejects_phase_lengths_that_would_overflow() {
        assert!(Cli::try_parse_from(["mtm", "track", "--work", "100000000"]).is_err());
        assert!(Cli::try_parse_from(["mtm", "track", "--long-break", "0"]).is_err());
        assert!(Cli::try_parse_from(["mtm", "track", "--short-break", "1441"]).is_err());
    }
}
