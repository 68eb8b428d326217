use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

use crate::domain::board::KanbanTab;

/// Command-line arguments for the Reybex client.
#[derive(Debug, Parser)]
#[command(
    name = "reybex",
    version,
    about = "Terminal client for the Reybex project-management backend"
)]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "REYBEX_CONFIG_FILE",
        value_name = "PATH",
        global = true,
        value_hint = ValueHint::FilePath
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: GlobalOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args, Default, Clone)]
pub struct GlobalOverrides {
    /// Override the backend API base URL.
    #[arg(long = "api-base-url", value_name = "URL", global = true)]
    pub api_base_url: Option<String>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        global = true,
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override where the login session is stored.
    #[arg(
        long = "session-file",
        value_name = "PATH",
        global = true,
        value_hint = ValueHint::FilePath
    )]
    pub session_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Sign in and store the session.
    Login(LoginArgs),
    /// Stop tracking, sign out and forget the session.
    Logout,
    /// Show the signed-in user.
    Whoami,
    /// Show sprint board counts, or the tasks of one column.
    Board(BoardArgs),
    /// Show a task with its rendered description.
    Task(TaskArgs),
    /// List the current user's tickets.
    Tickets,
    /// Show the most recent comments addressed to the current user.
    #[command(name = "last-comments")]
    LastComments,
    /// Time tracking.
    Track(TrackArgs),
    /// Render a block document JSON file to markup (offline).
    Render(RenderArgs),
}

#[derive(Debug, Args, Clone)]
pub struct LoginArgs {
    /// Account user name.
    #[arg(long, short = 'u', value_name = "NAME")]
    pub username: String,

    /// Read the password from this file instead of REYBEX_PASSWORD.
    #[arg(long = "password-file", value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub password_file: Option<PathBuf>,

    #[arg(long = "password", env = "REYBEX_PASSWORD", hide = true, hide_env_values = true)]
    pub password_env: Option<String>,
}

#[derive(Debug, Args, Clone, Default)]
pub struct BoardArgs {
    /// Column to list (todo, inProcess, wfc, b2r, done).
    #[arg(long, value_name = "TAB")]
    pub tab: Option<KanbanTab>,
}

#[derive(Debug, Args, Clone)]
pub struct TaskArgs {
    /// Task identifier.
    #[arg(value_name = "ID")]
    pub id: String,

    /// Include the comment thread.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub comments: bool,

    /// Include the time history.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub history: bool,
}

#[derive(Debug, Args, Clone)]
pub struct TrackArgs {
    #[command(subcommand)]
    pub command: TrackCommand,
}

#[derive(Debug, Subcommand, Clone)]
pub enum TrackCommand {
    /// Show the running booking, if any.
    Status,
    /// Start booking time on a task.
    Start {
        #[arg(value_name = "ID")]
        task_id: String,
    },
    /// End the running booking.
    Stop,
    /// Follow the running booking with a live timer.
    Watch {
        /// Stop after this many ticks instead of running until interrupted.
        #[arg(long, value_name = "COUNT")]
        ticks: Option<u32>,
    },
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    /// Document file (`{"blocks": [...]}` or a bare block array).
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,
}
