//! Command implementations.

use std::future::Future;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use sis_cli::browse::{self, BrowseCommand};
use sis_cli::payload::{self, assigned, attachment_from_path, references_existing};
use sis_cli::progress::ProgressDisplay;
use sis_cli::prompt::choose_action;
use sis_cli::render::{RenderOptions, alert_text, render_page, stack_alerts};
use sis_client::{ApiClient, ClientConfig, HttpObjectStore};
use sis_core::{
    AlertChannel, AlertKind, AlertSurface, Confirmation, FetchTicket, JumpInput,
    MutationWorkflow, PaginatedListController, WorkflowOutcome,
};
use sis_model::{College, Entity, EntityKind, PageQuery, Program, Student};

use crate::cli::{
    AddArgs, BrowseArgs, Command, DeleteArgs, EntityArg, ListArgs, UpdateArgs,
};

/// Run `body` with `$E` bound to the entity type named by `$entity`.
macro_rules! with_entity {
    ($entity:expr, $E:ident => $body:expr) => {
        match $entity {
            EntityArg::Students => {
                type $E = Student;
                $body
            }
            EntityArg::Programs => {
                type $E = Program;
                $body
            }
            EntityArg::Colleges => {
                type $E = College;
                $body
            }
        }
    };
}

/// Backend connection shared by all commands.
pub struct Session {
    client: ApiClient,
    config: ClientConfig,
    styled: bool,
}

impl Session {
    /// Load configuration and build the HTTP client.
    pub fn connect(config_path: Option<&Path>, base_url: Option<String>, styled: bool) -> Result<Self> {
        let config = ClientConfig::load(config_path)
            .context("failed to load configuration")?
            .with_base_url_override(base_url);
        let client = ApiClient::new(&config).context("failed to create HTTP client")?;
        tracing::debug!(api = client.api_root(), "connected");
        Ok(Self {
            client,
            config,
            styled,
        })
    }

    fn options(&self) -> RenderOptions {
        RenderOptions::terminal(self.styled)
    }

    fn store(&self) -> Result<HttpObjectStore> {
        HttpObjectStore::new(&self.config).context("profile image storage is not configured")
    }
}

/// Run a parsed command. Returns the process exit code.
pub async fn run(session: &Session, command: Command) -> Result<i32> {
    match command {
        Command::List(args) => with_entity!(args.entity, E => list::<E>(session, &args).await),
        Command::Browse(args) => with_entity!(args.entity, E => browse_list::<E>(session, &args).await),
        Command::Add(args) => match args.entity {
            EntityArg::Students => add_student(session, &args).await,
            other => {
                reject_image(args.image.as_ref(), other)?;
                with_entity!(other, E => add::<E>(session, &args.fields).await)
            }
        },
        Command::Update(args) => match args.entity {
            EntityArg::Students => update_student(session, &args).await,
            other => {
                reject_image(args.image.as_ref(), other)?;
                with_entity!(other, E => update::<E>(session, &args).await)
            }
        },
        Command::Delete(args) => with_entity!(args.entity, E => delete::<E>(session, &args).await),
        Command::Logout => logout(session).await,
    }
}

fn reject_image(image: Option<&PathBuf>, entity: EntityArg) -> Result<()> {
    if image.is_some() {
        bail!("--image is only supported for students, not {entity:?}");
    }
    Ok(())
}

// ----------------------------------------------------------------------------
// Lists
// ----------------------------------------------------------------------------

async fn list<E: Entity>(session: &Session, args: &ListArgs) -> Result<i32> {
    let sort = match &args.sort {
        Some(column) => E::sort_column(column)?,
        None => E::DEFAULT_SORT,
    };
    let page_index = usize::try_from(args.page.saturating_sub(1)).unwrap_or(0);
    let query = PageQuery::new(sort, args.page_size)
        .with_search(args.search.clone().unwrap_or_default())
        .with_direction(args.direction.into())
        .with_page(page_index);

    let mut controller = PaginatedListController::<E>::from_query(query)?.with_prefetch(false);
    let mut alerts = AlertChannel::<()>::default();
    let tickets = controller.start();
    controller
        .run_pending(&session.client, tickets, &mut alerts)
        .await;

    if let Some(code) = report_failure(&mut alerts, session.styled) {
        return Ok(code);
    }
    println!("{}", render_page(&controller.table_view(), &session.options()));
    Ok(0)
}

async fn browse_list<E>(session: &Session, args: &BrowseArgs) -> Result<i32>
where
    E: Entity,
    E::Create: DeserializeOwned + Default,
    E::Update: DeserializeOwned + Default,
{
    let mut controller = PaginatedListController::<E>::new(args.page_size);
    let mut alerts = AlertChannel::<()>::default();
    let mut jump = JumpInput::new(0);
    let tickets = controller.start();
    controller
        .run_pending(&session.client, tickets, &mut alerts)
        .await;

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        report_failure(&mut alerts, session.styled);
        jump.sync(controller.page_index());
        println!("{}", render_page(&controller.table_view(), &session.options()));
        let query = controller.query();
        print!(
            "{} [{} {}]> ",
            E::DISPLAY_NAME,
            query.sort_column,
            query.sort_direction.as_str()
        );
        io::stdout().flush()?;

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            return Ok(0);
        }
        let mut modal = Alerts::<E>::new(AlertSurface::Modal);
        let tickets: Vec<FetchTicket> = match browse::parse(&line) {
            BrowseCommand::Next => controller.next_page(),
            BrowseCommand::Previous => controller.previous_page(),
            BrowseCommand::Jump(text) => {
                let target = jump
                    .on_change(&text, controller.page_count())
                    .unwrap_or_else(|| jump.on_commit(controller.page_count()));
                controller.set_page_index(target)
            }
            BrowseCommand::Search(text) => controller.set_search_query(&text),
            BrowseCommand::Sort(column) => match controller.set_sort_column(&column) {
                Ok(tickets) => tickets,
                Err(err) => {
                    eprintln!("{err}");
                    Vec::new()
                }
            },
            BrowseCommand::ToggleDirection => controller.toggle_sort_direction(),
            BrowseCommand::PageSize(size) => controller.set_page_size(size),
            BrowseCommand::Refresh => controller.refresh(),
            BrowseCommand::Add(fields) => {
                let outcome = create::<E>(session, &fields, &mut modal).await.map(Some);
                mutated(&mut controller, outcome)
            }
            BrowseCommand::Update(fields) => {
                let outcome = modify::<E>(session, &fields, false, &mut modal).await;
                mutated(&mut controller, outcome)
            }
            BrowseCommand::Delete(key) => {
                let outcome = remove::<E>(session, &key, false, &mut modal).await;
                mutated(&mut controller, outcome)
            }
            BrowseCommand::Redraw => Vec::new(),
            BrowseCommand::Help => {
                println!("{}", browse::HELP);
                Vec::new()
            }
            BrowseCommand::Quit => return Ok(0),
            BrowseCommand::Unknown(input) => {
                eprintln!("unknown command '{input}', type h for help");
                Vec::new()
            }
        };
        controller
            .run_pending(&session.client, tickets, &mut alerts)
            .await;

        if modal.is_visible() {
            // The dialog's result stays on top of whatever the reload raised.
            let mut layers = Vec::new();
            if let Some(alert) = modal.take() {
                layers.push((modal.surface(), alert_text(&alert, session.styled)));
            }
            if let Some(alert) = alerts.take() {
                layers.push((alerts.surface(), alert_text(&alert, session.styled)));
            }
            for text in stack_alerts(layers) {
                println!("{text}");
            }
        }
    }
}

/// Reload the list after a browse mutation, or explain why nothing happened.
fn mutated<E: Entity>(
    controller: &mut PaginatedListController<E>,
    outcome: Result<Option<WorkflowOutcome>>,
) -> Vec<FetchTicket> {
    match outcome {
        Ok(Some(outcome)) => browse::refresh_after(controller, &outcome),
        Ok(None) => {
            println!("Cancelled.");
            Vec::new()
        }
        Err(err) => {
            eprintln!("{err:#}");
            Vec::new()
        }
    }
}

// ----------------------------------------------------------------------------
// Mutations
// ----------------------------------------------------------------------------

type Alerts<E> = AlertChannel<Confirmation<E>>;

async fn add<E>(session: &Session, fields: &[(String, String)]) -> Result<i32>
where
    E: Entity,
    E::Create: DeserializeOwned + Default,
{
    let mut alerts = Alerts::<E>::new(AlertSurface::Modal);
    create::<E>(session, fields, &mut alerts).await?;
    Ok(report(&mut alerts, session.styled))
}

async fn add_student(session: &Session, args: &AddArgs) -> Result<i32> {
    let Some(image) = &args.image else {
        return add::<Student>(session, &args.fields).await;
    };
    check_references::<Student>(session, &args.fields).await?;
    let payload = payload::build(&args.fields)?;
    let workflow = MutationWorkflow::<Student>::new();
    let attachment = attachment_from_path(image, workflow.upload_policy())?;
    let store = session.store()?;
    let mut alerts = Alerts::<Student>::new(AlertSurface::Modal);
    with_progress(
        &workflow,
        workflow.submit_create_with_attachment(payload, attachment, &session.client, &store, &mut alerts),
    )
    .await;
    Ok(report(&mut alerts, session.styled))
}

async fn update<E>(session: &Session, args: &UpdateArgs) -> Result<i32>
where
    E: Entity,
    E::Update: DeserializeOwned + Default,
{
    let mut alerts = Alerts::<E>::new(AlertSurface::Modal);
    let outcome = modify::<E>(session, &args.fields, args.yes, &mut alerts).await?;
    Ok(conclude(outcome.as_ref(), &mut alerts, "Update cancelled.", session.styled))
}

async fn update_student(session: &Session, args: &UpdateArgs) -> Result<i32> {
    let Some(image) = &args.image else {
        return update::<Student>(session, args).await;
    };
    check_references::<Student>(session, &args.fields).await?;
    let payload: <Student as Entity>::Update = payload::build(&args.fields)?;
    let workflow = MutationWorkflow::<Student>::new();
    let attachment = attachment_from_path(image, workflow.upload_policy())?;
    let store = session.store()?;
    let label = assigned(&args.fields, Student::KEY_FIELD).unwrap_or_default();
    let mut alerts = Alerts::<Student>::new(AlertSurface::Modal);

    // The prompt validates the fields; the upload path then runs the update itself.
    if let WorkflowOutcome::Aborted(_) = workflow.request_update(payload.clone(), label, &mut alerts) {
        return Ok(report(&mut alerts, session.styled));
    }
    if confirm(&mut alerts, args.yes)?.is_none() {
        println!("Update cancelled.");
        return Ok(0);
    }
    with_progress(
        &workflow,
        workflow.submit_update_with_attachment(
            payload,
            attachment,
            args.previous_image.as_deref(),
            &session.client,
            &store,
            &mut alerts,
        ),
    )
    .await;
    Ok(report(&mut alerts, session.styled))
}

async fn delete<E: Entity>(session: &Session, args: &DeleteArgs) -> Result<i32> {
    let mut alerts = Alerts::<E>::new(AlertSurface::Modal);
    let outcome = remove::<E>(session, &args.key, args.yes, &mut alerts).await?;
    Ok(conclude(outcome.as_ref(), &mut alerts, "Deletion cancelled.", session.styled))
}

/// Create a record from field assignments.
async fn create<E>(
    session: &Session,
    fields: &[(String, String)],
    alerts: &mut Alerts<E>,
) -> Result<WorkflowOutcome>
where
    E: Entity,
    E::Create: DeserializeOwned + Default,
{
    check_references::<E>(session, fields).await?;
    let payload: E::Create = payload::build(fields)?;
    let workflow = MutationWorkflow::<E>::new();
    Ok(with_progress(&workflow, workflow.submit_create(&payload, &session.client, alerts)).await)
}

/// Confirm and run an update. `None` when the prompt was cancelled.
async fn modify<E>(
    session: &Session,
    fields: &[(String, String)],
    assume_yes: bool,
    alerts: &mut Alerts<E>,
) -> Result<Option<WorkflowOutcome>>
where
    E: Entity,
    E::Update: DeserializeOwned + Default,
{
    check_references::<E>(session, fields).await?;
    let payload: E::Update = payload::build(fields)?;
    let label = assigned(fields, E::KEY_FIELD).unwrap_or_default();
    let workflow = MutationWorkflow::<E>::new();

    let requested = workflow.request_update(payload, label, alerts);
    if let WorkflowOutcome::Aborted(_) = requested {
        return Ok(Some(requested));
    }
    let Some(confirmation) = confirm(alerts, assume_yes)? else {
        return Ok(None);
    };
    Ok(Some(
        with_progress(&workflow, workflow.resolve(confirmation, &session.client, alerts)).await,
    ))
}

/// Confirm and run a delete. `None` when the prompt was cancelled.
async fn remove<E: Entity>(
    session: &Session,
    key: &str,
    assume_yes: bool,
    alerts: &mut Alerts<E>,
) -> Result<Option<WorkflowOutcome>> {
    let workflow = MutationWorkflow::<E>::new();
    workflow.request_delete(E::key_payload(key), key, alerts);
    let Some(confirmation) = confirm(alerts, assume_yes)? else {
        return Ok(None);
    };
    Ok(Some(
        with_progress(&workflow, workflow.resolve(confirmation, &session.client, alerts)).await,
    ))
}

/// Refuse a student or program that points at a program or college the
/// backend does not have.
async fn check_references<E: Entity>(session: &Session, fields: &[(String, String)]) -> Result<()> {
    match E::KIND {
        EntityKind::Students => {
            check_reference::<Program>(session, fields, &["program_code", "new_program_code"]).await
        }
        EntityKind::Programs => {
            check_reference::<College>(session, fields, &["college_code", "new_college_code"]).await
        }
        EntityKind::Colleges => Ok(()),
    }
}

async fn check_reference<P: Entity>(
    session: &Session,
    fields: &[(String, String)],
    names: &[&str],
) -> Result<()> {
    let Some(code) = names.iter().find_map(|name| assigned(fields, name)) else {
        return Ok(());
    };
    if code.trim().is_empty() {
        return Ok(());
    }
    let parents = session
        .client
        .list_all::<P>()
        .await
        .with_context(|| format!("failed to load {}", P::PATH))?;
    if !references_existing(&parents, code) {
        bail!("{} '{}' does not exist", P::DISPLAY_NAME, code.trim());
    }
    Ok(())
}

async fn logout(session: &Session) -> Result<i32> {
    match session.client.logout().await {
        Ok(message) => {
            println!("{message}");
            Ok(0)
        }
        Err(err) => {
            tracing::error!(error = %err, "logout failed");
            eprintln!("{}", err.user_message());
            Ok(1)
        }
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

/// Resolve the visible prompt, either by asking or by picking its continuation.
fn confirm<E: Entity>(alerts: &mut Alerts<E>, assume_yes: bool) -> Result<Option<Confirmation<E>>> {
    let Some(alert) = alerts.current() else {
        return Ok(None);
    };
    let choice = if assume_yes {
        alert
            .actions
            .iter()
            .position(|action| action.on_activate.is_some())
    } else {
        choose_action(alert, &mut io::stdin().lock(), &mut io::stderr())?
    };
    match choice {
        Some(index) => Ok(alerts.activate(index)),
        None => {
            alerts.dismiss();
            Ok(None)
        }
    }
}

/// Mirror the workflow's progress on stderr while `operation` runs.
async fn with_progress<E, F>(workflow: &MutationWorkflow<E>, operation: F) -> WorkflowOutcome
where
    E: Entity,
    F: Future<Output = WorkflowOutcome>,
{
    let display = ProgressDisplay::spawn(workflow.subscribe(), io::stderr().is_terminal());
    let outcome = operation.await;
    display.finish();
    outcome
}

/// Report a confirmed mutation, or note that its prompt was cancelled.
fn conclude<E: Entity>(
    outcome: Option<&WorkflowOutcome>,
    alerts: &mut Alerts<E>,
    cancelled: &str,
    styled: bool,
) -> i32 {
    if outcome.is_none() {
        println!("{cancelled}");
        return 0;
    }
    report(alerts, styled)
}

/// Print the final alert. Warnings and errors go to stderr and yield exit code 1.
fn report<A>(alerts: &mut AlertChannel<A>, styled: bool) -> i32 {
    let Some(alert) = alerts.take() else {
        return 0;
    };
    let text = alert_text(&alert, styled);
    if matches!(alert.kind, AlertKind::Warning | AlertKind::Danger) {
        eprintln!("{text}");
        1
    } else {
        println!("{text}");
        0
    }
}

/// Print a pending warning or error, if any.
fn report_failure<A>(alerts: &mut AlertChannel<A>, styled: bool) -> Option<i32> {
    let failed = alerts
        .current()
        .is_some_and(|alert| matches!(alert.kind, AlertKind::Warning | AlertKind::Danger));
    failed.then(|| report(alerts, styled))
}
