//! Commands accepted by the interactive `browse` prompt.

use sis_core::{FetchTicket, PaginatedListController, WorkflowOutcome};
use sis_model::Entity;

/// One line typed at the browse prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Next,
    Previous,
    /// Raw text for the jump field, one-based.
    Jump(String),
    /// New search text; empty clears the search.
    Search(String),
    Sort(String),
    ToggleDirection,
    PageSize(usize),
    Refresh,
    /// Field assignments for a new record.
    Add(Vec<(String, String)>),
    /// Field assignments for an update, key field included.
    Update(Vec<(String, String)>),
    /// Key of the record to delete.
    Delete(String),
    Redraw,
    Help,
    Quit,
    Unknown(String),
}

/// Help text listing the browse commands.
pub const HELP: &str = "\
n | next            next page
p | prev            previous page
g | goto <page>     jump to a page
/ <text>            search (empty clears)
s | sort <column>   sort by column
d | dir             toggle sort direction
size <rows>         rows per page
r | refresh         reload the current page
add FIELD=VALUE...  create a record
update FIELD=VALUE... update a record (include its key field)
delete <key>        delete a record
h | help            this help
q | quit            leave";

/// Parse one prompt line.
pub fn parse(line: &str) -> BrowseCommand {
    let line = line.trim();
    if let Some(search) = line.strip_prefix('/') {
        return BrowseCommand::Search(search.trim().to_string());
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    match (word.to_ascii_lowercase().as_str(), rest) {
        ("", _) => BrowseCommand::Redraw,
        ("n" | "next", "") => BrowseCommand::Next,
        ("p" | "prev" | "previous", "") => BrowseCommand::Previous,
        ("g" | "goto", page) => BrowseCommand::Jump(page.to_string()),
        ("s" | "sort", column) if !column.is_empty() => BrowseCommand::Sort(column.to_string()),
        ("d" | "dir", "") => BrowseCommand::ToggleDirection,
        ("size", rows) => match rows.parse() {
            Ok(size) => BrowseCommand::PageSize(size),
            Err(_) => BrowseCommand::Unknown(line.to_string()),
        },
        ("r" | "refresh", "") => BrowseCommand::Refresh,
        ("add", fields) => match parse_fields(fields) {
            Ok(fields) => BrowseCommand::Add(fields),
            Err(_) => BrowseCommand::Unknown(line.to_string()),
        },
        ("update" | "edit", fields) => match parse_fields(fields) {
            Ok(fields) if !fields.is_empty() => BrowseCommand::Update(fields),
            _ => BrowseCommand::Unknown(line.to_string()),
        },
        ("delete" | "del" | "rm", key) if !key.is_empty() => BrowseCommand::Delete(key.to_string()),
        ("h" | "help" | "?", "") => BrowseCommand::Help,
        ("q" | "quit" | "exit", "") => BrowseCommand::Quit,
        _ => BrowseCommand::Unknown(line.to_string()),
    }
}

/// Split `name=value name=value ...` into assignments.
///
/// A word of the form `name=...` with a lowercase `name` starts a new field;
/// any other word continues the previous value after a single space, so
/// `college_name=College of Arts` keeps its spaces.
///
/// # Errors
///
/// Fails when the text does not start with a field assignment.
pub fn parse_fields(text: &str) -> Result<Vec<(String, String)>, String> {
    let mut fields: Vec<(String, String)> = Vec::new();
    for word in text.split_whitespace() {
        match word.split_once('=') {
            Some((name, value)) if is_field_name(name) => {
                fields.push((name.to_string(), value.to_string()));
            }
            _ => match fields.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(word);
                }
                None => return Err(format!("expected FIELD=VALUE, got '{word}'")),
            },
        }
    }
    Ok(fields)
}

fn is_field_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_lowercase() || c == '_')
}

/// Fetches that bring the list up to date after a mutation finished.
///
/// Anything short of a completed mutation leaves the list alone.
pub fn refresh_after<E: Entity>(
    controller: &mut PaginatedListController<E>,
    outcome: &WorkflowOutcome,
) -> Vec<FetchTicket> {
    outcome
        .completed()
        .map(|kind| controller.apply_mutation(kind))
        .unwrap_or_default()
}
