//! # FITOX
//!
//! A terminal habit tracker. Plan dated tasks by category and priority, watch
//! your streak and weekly progress, and ask the built-in coach for a push.
//!
//! ## Features
//!
//! *   **Tasks**: Health, Study, Work and Personal tasks with Low/Medium/High priority,
//!     a due date and an optional time slot.
//! *   **Dashboard**: Completed/pending today, current streak, completion rate,
//!     the last seven days and a per-category breakdown.
//! *   **Coach**: A keyword-driven motivational chatbot with a persistent transcript.
//! *   **Dual Interface**: Scriptable CLI plus an interactive TUI.
//! *   **Data Persistence**: JSON files in the XDG data directory.
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! ```bash
//! fitox
//! # or explicitly
//! fitox ui
//! ```
//!
//! #### TUI Key Bindings
//!
//! **Global**
//! *   `q`: Quit
//! *   `v` / `Tab`: Cycle Tasks, Dashboard, Coach
//!
//! **Task View**
//! *   `a`: Add new task
//! *   `Space`: Toggle done
//! *   `d`: Delete selected task
//! *   `n` / `t` / `s`: Edit title / due date / time slot
//! *   `g` / `p`: Cycle category / priority
//! *   `f` / `r`: Cycle category / priority filter
//! *   `o` / `O`: Cycle sort field / flip direction
//!
//! **Coach View**
//! *   `i`: Type a message, `Enter` to send
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! fitox add "Morning run" --category health --priority high --due 2026-01-05 --time 07:00
//! fitox list --category health --sort due
//! fitox toggle 3
//! fitox stats
//! fitox chat "I need some motivation"
//! ```
//!
//! ## Data Storage
//!
//! Data is saved in your local data directory (`~/.local/share/fitox/` on Linux).
//! Override it with the `FITOX_DATA_DIR` environment variable or `data_dir` in
//! `~/.config/fitox/config.toml`.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::error;

use fitox::commands::*;
use fitox::config::Config;
use fitox::errors::Result;
use fitox::listing::{SortDirection, SortField, TaskFilter};
use fitox::logging;
use fitox::models::{Category, Priority};
use fitox::tui::run_tui;

#[derive(Parser)]
#[command(name = "fitox")]
#[command(about = "Habit tracker with streaks, analytics and a motivational coach", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// Health, Study, Work or Personal
        #[arg(short, long)]
        category: Option<String>,
        /// Low, Medium or High
        #[arg(short, long)]
        priority: Option<String>,
        /// Due date in YYYY-MM-DD (default: today)
        #[arg(short, long)]
        due: Option<String>,
        /// Time slot in HH:MM
        #[arg(short, long)]
        time: Option<String>,
    },
    /// List tasks, pending first
    List {
        /// Only this category
        #[arg(short, long)]
        category: Option<Category>,
        /// Only this priority
        #[arg(short, long)]
        priority: Option<Priority>,
        /// Sort by priority, due or status
        #[arg(short, long, default_value = "priority")]
        sort: SortField,
        /// Reverse the sort order
        #[arg(long)]
        desc: bool,
    },
    /// Toggle a task between pending and done
    Toggle {
        id: u64,
    },
    /// Edit a task
    Edit {
        id: u64,
        /// New title
        #[arg(short = 'n', long)]
        title: Option<String>,
        /// New category
        #[arg(short, long)]
        category: Option<String>,
        /// New priority
        #[arg(short, long)]
        priority: Option<String>,
        /// New due date
        #[arg(short, long)]
        due: Option<String>,
        /// New time slot (empty string clears it)
        #[arg(short, long)]
        time: Option<String>,
    },
    /// Remove a task
    Remove {
        id: u64,
    },
    /// Show the dashboard: streak, completion rate, weekly progress
    Stats,
    /// Ask the coach something
    Chat {
        /// Your message
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Show the coach transcript
    History {
        /// Delete the transcript instead
        #[arg(long)]
        clear: bool,
    },
    /// Print a motivational quote
    Quote,
    /// Create or switch the local profile
    Login {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        /// Profile image path or URL
        #[arg(short, long)]
        image: Option<String>,
    },
    /// Forget the local profile
    Logout,
    /// Show the current profile
    Whoami,
    /// Import tasks from a JSON export
    Import {
        file: PathBuf,
    },
    /// Reset all data (tasks, chat history, profile)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
    /// Open interactive TUI
    Ui,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(config.log_level.as_deref());

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: &Config) -> Result<()> {
    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "fitox", &mut io::stdout());
        return Ok(());
    }

    let ctx = Context::open(config)?;
    let mut rng = StdRng::from_entropy();

    match cli.command {
        Some(Commands::Add { title, category, priority, due, time }) => {
            let fields = TaskFields { title: Some(title), category, priority, due, time };
            cmd_add(&ctx, fields, false).map(|_| ())
        }
        Some(Commands::List { category, priority, sort, desc }) => {
            let direction = if desc { SortDirection::Desc } else { SortDirection::Asc };
            cmd_list(&ctx, TaskFilter { category, priority }, sort, direction)
        }
        Some(Commands::Toggle { id }) => cmd_toggle(&ctx, id, false).map(|_| ()),
        Some(Commands::Edit { id, title, category, priority, due, time }) => {
            let fields = TaskFields { title, category, priority, due, time };
            cmd_edit(&ctx, id, fields, false).map(|_| ())
        }
        Some(Commands::Remove { id }) => cmd_remove(&ctx, id, false).map(|_| ()),
        Some(Commands::Stats) => cmd_stats(&ctx, &mut rng),
        Some(Commands::Chat { message }) => {
            cmd_chat(&ctx, &message.join(" "), &mut rng, false).map(|_| ())
        }
        Some(Commands::History { clear }) => cmd_history(&ctx, clear),
        Some(Commands::Quote) => {
            cmd_quote(&mut rng);
            Ok(())
        }
        Some(Commands::Login { name, email, image }) => {
            cmd_login(&ctx, name, email, image, false).map(|_| ())
        }
        Some(Commands::Logout) => cmd_logout(&ctx),
        Some(Commands::Whoami) => cmd_whoami(&ctx),
        Some(Commands::Import { file }) => cmd_import(&ctx, &file, false).map(|_| ()),
        Some(Commands::Reset { force }) => cmd_reset(&ctx, force),
        Some(Commands::Completions { .. }) => Ok(()),
        Some(Commands::Ui) | None => run_tui(ctx),
    }
}
