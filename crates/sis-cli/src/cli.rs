//! CLI argument definitions for the student information system client.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use sis_cli::payload::parse_assignment;
use sis_core::DEFAULT_PAGE_SIZE;
use sis_model::SortDirection;

#[derive(Parser)]
#[command(
    name = "sis",
    version,
    about = "Student information system - browse and edit students, programs and colleges",
    long_about = "Browse and edit the students, programs and colleges of a student \
                  information system backend.\n\n\
                  Lists are paged and sorted on the server; rows with equal sort values \
                  are ordered by their key, ascending."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Configuration file (default: sis.toml in the platform config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Backend address, overriding the configuration file and SIS_BASE_URL.
    #[arg(long = "base-url", value_name = "URL", global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print one page of a list.
    List(ListArgs),

    /// Page through a list interactively.
    Browse(BrowseArgs),

    /// Add a record.
    Add(AddArgs),

    /// Update a record.
    Update(UpdateArgs),

    /// Delete a record.
    Delete(DeleteArgs),

    /// End the backend session.
    Logout,
}

#[derive(Parser)]
pub struct ListArgs {
    /// Which list to show.
    #[arg(value_enum)]
    pub entity: EntityArg,

    /// Case-insensitive search across the list's text columns.
    #[arg(long = "search", short = 'q', value_name = "TEXT")]
    pub search: Option<String>,

    /// Column to sort by (default: the list's key column).
    #[arg(long = "sort", value_name = "COLUMN")]
    pub sort: Option<String>,

    /// Sort direction.
    #[arg(long = "direction", value_enum, default_value = "asc")]
    pub direction: DirectionArg,

    /// Page number, starting at 1. Out-of-range pages show the nearest page.
    #[arg(long = "page", default_value_t = 1)]
    pub page: i64,

    /// Rows per page.
    #[arg(long = "page-size", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
}

#[derive(Parser)]
pub struct BrowseArgs {
    /// Which list to browse.
    #[arg(value_enum)]
    pub entity: EntityArg,

    /// Rows per page.
    #[arg(long = "page-size", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
}

#[derive(Parser)]
pub struct AddArgs {
    /// What to add.
    #[arg(value_enum)]
    pub entity: EntityArg,

    /// Field value, e.g. `--set college_code=CCS`. Repeat for each field.
    #[arg(long = "set", short = 's', value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub fields: Vec<(String, String)>,

    /// Profile image to upload (students only).
    #[arg(long = "image", value_name = "PATH")]
    pub image: Option<PathBuf>,
}

#[derive(Parser)]
pub struct UpdateArgs {
    /// What to update.
    #[arg(value_enum)]
    pub entity: EntityArg,

    /// Field value, e.g. `--set new_college_name=Engineering`. Repeat for each field.
    #[arg(long = "set", short = 's', value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub fields: Vec<(String, String)>,

    /// Replacement profile image (students only).
    #[arg(long = "image", value_name = "PATH")]
    pub image: Option<PathBuf>,

    /// Stored path of the image being replaced, removed after a successful update.
    #[arg(long = "previous-image", value_name = "KEY", requires = "image")]
    pub previous_image: Option<String>,

    /// Skip the confirmation prompt.
    #[arg(long = "yes", short = 'y')]
    pub yes: bool,
}

#[derive(Parser)]
pub struct DeleteArgs {
    /// What to delete.
    #[arg(value_enum)]
    pub entity: EntityArg,

    /// Key of the record (ID number, program code or college code).
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Skip the confirmation prompt.
    #[arg(long = "yes", short = 'y')]
    pub yes: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EntityArg {
    Students,
    Programs,
    Colleges,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    Asc,
    Desc,
}

impl From<DirectionArg> for SortDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Asc => SortDirection::Asc,
            DirectionArg::Desc => SortDirection::Desc,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
