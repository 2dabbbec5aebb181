//! # Day Weaver
//!
//! An AI-assisted personal scheduler for the terminal. Describe the day you
//! want in plain language and let the AI expand it into tasks, then browse
//! and edit those tasks through list, agenda and month views.
//!
//! ## Features
//!
//! *   **AI Scheduling**: `dayweaver schedule "..."` turns a natural-language
//!     description into a schedule and merges the extracted tasks into your
//!     list.
//! *   **Dual Interface**:
//!     *   **CLI**: Scriptable and quick for single commands.
//!     *   **TUI**: Interactive dashboard to manage tasks visually.
//! *   **Calendar Views**: Per-day agenda and a month grid annotated with
//!     priority and important-date markers.
//! *   **Analytics**: Time-usage estimates, an efficiency score and a
//!     burnout-risk assessment derived from your task list.
//! *   **Data Persistence**: Tasks and important dates are stored in
//!     standard XDG data directories (JSON format).
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! Run the command without arguments to launch the interactive UI:
//!
//! ```bash
//! dayweaver
//! # or explicitly
//! dayweaver ui
//! ```
//!
//! #### TUI Key Bindings
//!
//! *   `q`: Quit
//! *   `a`: Add new task
//! *   `Space`: Cycle status (To Do -> In Progress -> Done -> Blocked)
//! *   `d`: Delete selected task
//! *   `n`/`t`/`p`/`g`: Edit name / due date / priority / category
//! *   `/`: Search filter
//! *   `c`: Toggle Show/Hide Done Tasks
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! # Basic task
//! dayweaver add "Write report" --due 2025-12-01 --priority high --category Work
//!
//! # List with filters
//! dayweaver list --search report --status todo
//!
//! # AI schedule creation (merges extracted tasks)
//! dayweaver schedule "Create a daily routine for exam prep"
//!
//! # Break a task into sub-tasks and attach them
//! dayweaver breakdown "Prepare slides by Friday" --attach <ID>
//!
//! # Calendar
//! dayweaver day 2025-12-01
//! dayweaver month
//!
//! # Analytics
//! dayweaver analytics efficiency
//! dayweaver analytics burnout
//! ```
//!
//! ## Data Storage
//!
//! Records are saved in your local data directory:
//! *   Linux: `~/.local/share/dayweaver/`
//! *   macOS: `~/Library/Application Support/dayweaver/`
//! *   Windows: `%APPDATA%\dayweaver\`
//!
//! You can override this by setting the `DAYWEAVER_DATA_DIR` environment
//! variable.
//!
//! ## AI Service
//!
//! The AI-backed commands talk to an OpenAI-style chat-completions endpoint
//! configured through `DAYWEAVER_API_URL`, `DAYWEAVER_API_KEY` and
//! `DAYWEAVER_MODEL` (a `.env` file is honored).

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use tracing_subscriber::EnvFilter;

use dayweaver::commands::*;
use dayweaver::tui::run_tui;

#[derive(Parser)]
#[command(name = "dayweaver")]
#[command(about = "AI-assisted terminal scheduler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task name (quoted if it has spaces)
        name: String,
        /// Free-text description
        #[arg(short, long)]
        description: Option<String>,
        /// Due date in YYYY-MM-DD
        #[arg(short = 'D', long)]
        due: Option<String>,
        /// Priority (low, medium, high)
        #[arg(short, long)]
        priority: Option<String>,
        /// Category, e.g. Work, Study, Personal
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List tasks
    List {
        /// Substring match on name or description
        #[arg(short, long, default_value = "")]
        search: String,
        /// Filter by status (todo, inprogress, done, blocked)
        #[arg(short = 'S', long)]
        status: Option<String>,
        /// Filter by priority (low, medium, high)
        #[arg(short, long)]
        priority: Option<String>,
    },
    /// Change a task's status
    Status {
        id: String,
        /// New status (todo, inprogress, done, blocked)
        status: String,
    },
    /// Edit a task
    Edit {
        id: String,
        /// New task name
        #[arg(short, long)]
        name: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
        /// New due date
        #[arg(short = 'D', long)]
        due: Option<String>,
        /// New priority
        #[arg(short, long)]
        priority: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Remove a task
    Remove {
        id: String,
    },
    /// Set a sub-task's status
    Subtask {
        /// Parent task id
        id: String,
        /// Sub-task id
        subtask: String,
        /// New status (todo, inprogress, done, blocked)
        status: String,
    },
    /// Manage important dates
    Date {
        #[command(subcommand)]
        command: DateCommands,
    },
    /// Show the agenda for one day (default: today)
    Day {
        date: Option<String>,
    },
    /// Show a month grid with priority and important-date markers
    Month {
        /// Any date inside the month (default: today)
        date: Option<String>,
    },
    /// Create a schedule from a description and merge the extracted tasks
    Schedule {
        /// Natural-language description of the desired schedule
        description: String,
    },
    /// Break a task into sub-tasks with time estimates
    Breakdown {
        /// The task to break down, deadline included
        task: String,
        /// Attach the resulting sub-tasks to this task id
        #[arg(short, long)]
        attach: Option<String>,
    },
    /// Ask the AI to reschedule open tasks for a given reason
    Reallocate {
        /// Why the tasks need rescheduling, e.g. "I have a fever today"
        reason: String,
    },
    /// Task-list analytics
    Analytics {
        #[command(subcommand)]
        command: AnalyticsCommands,
    },
    /// Adjust the day around a calendar event (reminders + checklist)
    MeetingPrep {
        /// Event details including title and time
        event: String,
    },
    /// Reset the database (delete all tasks and important dates)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

#[derive(Subcommand)]
enum DateCommands {
    /// Add an important date
    Add {
        /// Date in YYYY-MM-DD
        date: String,
        /// Description, e.g. "Mom's Birthday"
        description: String,
    },
    /// List important dates
    List,
    /// Remove an important date
    Remove {
        id: String,
    },
}

#[derive(Subcommand)]
enum AnalyticsCommands {
    /// Weekly time-usage estimate per life category
    Usage,
    /// Efficiency score for the current task list
    Efficiency,
    /// Burnout-risk assessment
    Burnout,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Add {
            name,
            description,
            due,
            priority,
            category,
        }) => cmd_add(name, description, due, priority, category, false),
        Some(Commands::List {
            search,
            status,
            priority,
        }) => cmd_list(search, status, priority),
        Some(Commands::Status { id, status }) => cmd_status(id, status, false),
        Some(Commands::Edit {
            id,
            name,
            description,
            due,
            priority,
            category,
        }) => cmd_edit(id, name, description, due, priority, category, false),
        Some(Commands::Remove { id }) => cmd_remove(id, false),
        Some(Commands::Subtask {
            id,
            subtask,
            status,
        }) => cmd_subtask(id, subtask, status, false),
        Some(Commands::Date { command }) => match command {
            DateCommands::Add { date, description } => cmd_date_add(date, description, false),
            DateCommands::List => cmd_date_list(),
            DateCommands::Remove { id } => cmd_date_remove(id, false),
        },
        Some(Commands::Day { date }) => cmd_day(date),
        Some(Commands::Month { date }) => cmd_month(date),
        Some(Commands::Schedule { description }) => cmd_schedule(description, false).await,
        Some(Commands::Breakdown { task, attach }) => cmd_breakdown(task, attach, false).await,
        Some(Commands::Reallocate { reason }) => cmd_reallocate(reason, false).await,
        Some(Commands::Analytics { command }) => match command {
            AnalyticsCommands::Usage => cmd_usage(false).await,
            AnalyticsCommands::Efficiency => cmd_efficiency(false).await,
            AnalyticsCommands::Burnout => cmd_burnout(false).await,
        },
        Some(Commands::MeetingPrep { event }) => cmd_meeting_prep(event, false).await,
        Some(Commands::Reset { force }) => cmd_reset(force),
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "dayweaver", &mut io::stdout());
        }
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui() {
                eprintln!("Error running TUI: {}", e);
            }
        }
    }
}
