mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use daylist::config::{self, Backend, Config};
use daylist::domain::dates::{self, format_date, parse_date};
use daylist::domain::{display_title, SubtaskPatch, TaskPatch};
use daylist::persistence::{ensure_dir, get_data_dir, init_local_data_dir, EntityStore};
use daylist::TaskRepository;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "daylist")]
#[command(about = "A small local to-do list with dated tasks and subtasks", long_about = None)]
struct Cli {
    /// Data directory to use instead of .daylist / ~/.daylist
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Store backend, overriding config.json
    #[arg(long, global = true, value_enum)]
    backend: Option<Backend>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .daylist directory in the current directory
    Init,
    /// Add a task for today, or for another day with --date
    Add {
        text: String,
        /// Date in YYYY-MM-DD format. Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show today's summary, tasks and leftovers (the default)
    Today,
    /// Show today's tasks split into uncompleted and completed
    All,
    /// Show tasks planned after today
    Future,
    /// Mark a task (and all its subtasks) complete
    Done { id: i64 },
    /// Mark a task (and all its subtasks) incomplete
    Undo { id: i64 },
    /// Change a task's text
    Edit { id: i64, text: String },
    /// Move a task to another date (YYYY-MM-DD)
    Move { id: i64, date: String },
    /// Delete a task and its subtasks
    Rm { id: i64 },
    /// Delete every completed task for a date
    Clear {
        /// Date in YYYY-MM-DD format. Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Work with subtasks
    Sub {
        #[command(subcommand)]
        command: SubCommands,
    },
    /// Show where tasks are stored and whether the store is readable
    Status,
}

#[derive(Subcommand)]
enum SubCommands {
    /// Add a subtask to a task
    Add { task_id: i64, text: String },
    /// Mark a subtask complete
    Done { id: i64 },
    /// Mark a subtask incomplete
    Undo { id: i64 },
    /// Change a subtask's text
    Edit { id: i64, text: String },
    /// Delete a subtask
    Rm { id: i64 },
}

type Repo = TaskRepository<Box<dyn EntityStore>>;

/// Where tasks live, as chosen on the command line
struct StoreArgs {
    data_dir: Option<PathBuf>,
    backend: Option<Backend>,
}

/// An opened repository with the location it was resolved from
struct Session {
    repo: Repo,
    data_dir: PathBuf,
    backend: Backend,
}

impl StoreArgs {
    fn open(&self) -> Result<Session> {
        let data_dir = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => get_data_dir()?,
        };
        let data_dir = ensure_dir(&data_dir)?;
        let config = config::load_config(config::config_file(&data_dir))?;
        let backend = self.backend.unwrap_or(config.backend);
        debug!(data_dir = %data_dir.display(), ?backend, "using store");

        let store = config::open_store(&data_dir, backend)?;
        let repo = TaskRepository::new(store).context("Failed to read existing tasks")?;
        Ok(Session {
            repo,
            data_dir,
            backend,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = StoreArgs {
        data_dir: cli.data_dir,
        backend: cli.backend,
    };
    let today = dates::today();

    match cli.command.unwrap_or(Commands::Today) {
        Commands::Init => init(store.backend)?,
        Commands::Add { text, date } => {
            let date = optional_date(date.as_deref())?;
            let task = store.open()?.repo.create_task(&text, date)?;
            println!("Added #{} for {}: {}", task.id, format_date(task.date), task.text);
        }
        Commands::Today => {
            let tasks = store.open()?.repo.list_all_tasks()?;
            print!("{}", render::render_home(&tasks, today));
        }
        Commands::All => {
            let tasks = store.open()?.repo.list_all_tasks()?;
            print!("{}", render::render_all(&tasks, today));
        }
        Commands::Future => {
            let tasks = store.open()?.repo.list_all_tasks()?;
            print!("{}", render::render_future(&tasks, today));
        }
        Commands::Done { id } => set_task_completed(&mut store.open()?.repo, id, true)?,
        Commands::Undo { id } => set_task_completed(&mut store.open()?.repo, id, false)?,
        Commands::Edit { id, text } => {
            let task = store.open()?.repo.update_task(id, TaskPatch::text(text))?;
            println!("Updated #{}: {}", task.id, display_title(&task));
        }
        Commands::Move { id, date } => {
            let date = parse_date(&date)?;
            let task = store.open()?.repo.update_task(id, TaskPatch::date(date))?;
            println!("Moved #{} to {}", task.id, format_date(task.date));
        }
        Commands::Rm { id } => {
            store.open()?.repo.delete_task(id)?;
            println!("Deleted #{}", id);
        }
        Commands::Clear { date } => {
            let date = optional_date(date.as_deref())?;
            let removed = store.open()?.repo.delete_completed_tasks(date)?;
            println!("Deleted {} completed task(s) for {}", removed, format_date(date));
        }
        Commands::Sub { command } => run_sub(&mut store.open()?.repo, command)?,
        Commands::Status => {
            let session = store.open()?;
            session.repo.health_check()?;
            let tasks = session.repo.list_all_tasks()?;
            let subtasks: usize = tasks.iter().map(|t| t.subtasks.len()).sum();
            println!("Data directory: {}", session.data_dir.display());
            println!("Backend: {:?} ({})", session.backend, session.backend.file_name());
            println!("Tasks: {}  Subtasks: {}", tasks.len(), subtasks);
        }
    }

    Ok(())
}

fn run_sub(repo: &mut Repo, command: SubCommands) -> Result<()> {
    match command {
        SubCommands::Add { task_id, text } => {
            let subtask = repo.create_subtask(task_id, &text)?;
            let task = repo.get_task(task_id)?;
            println!("Added subtask #{} to {}", subtask.id, display_title(&task));
        }
        SubCommands::Done { id } => {
            let task = repo.set_subtask_completed(id, true)?;
            println!("{}{}", display_title(&task), completed_suffix(task.completed));
        }
        SubCommands::Undo { id } => {
            let task = repo.set_subtask_completed(id, false)?;
            println!("{}{}", display_title(&task), completed_suffix(task.completed));
        }
        SubCommands::Edit { id, text } => {
            let subtask = repo.update_subtask(id, SubtaskPatch::text(text))?;
            println!("Updated subtask #{}: {}", subtask.id, subtask.text);
        }
        SubCommands::Rm { id } => {
            let task = repo.delete_subtask(id)?;
            println!("Deleted subtask #{} from {}", id, display_title(&task));
        }
    }
    Ok(())
}

fn set_task_completed(repo: &mut Repo, id: i64, completed: bool) -> Result<()> {
    let task = repo.update_task(id, TaskPatch::completed(completed))?;
    println!("{}{}", display_title(&task), completed_suffix(task.completed));
    Ok(())
}

fn completed_suffix(completed: bool) -> &'static str {
    if completed {
        " - done"
    } else {
        " - open"
    }
}

fn optional_date(input: Option<&str>) -> Result<chrono::NaiveDate> {
    match input {
        Some(s) => Ok(parse_date(s)?),
        None => Ok(dates::today()),
    }
}

fn init(backend: Option<Backend>) -> Result<()> {
    let current_dir = std::env::current_dir().context("Could not determine current directory")?;
    let data_dir = init_local_data_dir(&current_dir)?;

    let config = Config {
        backend: backend.unwrap_or_default(),
    };
    config::save_config(config::config_file(&data_dir), &config)?;

    println!("Initialized daylist directory: {}", data_dir.display());
    println!("Tasks will be stored with the {:?} backend.", config.backend);
    Ok(())
}
