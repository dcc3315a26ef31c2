use anyhow::{Context, anyhow};
use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::calc::{Calculator, parse_keys};
use crate::cli::Invocation;
use crate::filter::ViewFilter;
use crate::markup;
use crate::render::Renderer;
use crate::store::{EditOutcome, TodoStore};

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "add",
        "calc",
        "clear-completed",
        "delete",
        "edit",
        "export",
        "help",
        "html",
        "list",
        "toggle",
        "version",
    ]
}

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[instrument(skip(store, renderer, inv))]
pub fn dispatch(
    store: &mut TodoStore,
    renderer: &mut Renderer,
    inv: Invocation,
) -> anyhow::Result<()> {
    let now = Utc::now();
    let command = inv.command.as_str();

    debug!(command, args = ?inv.command_args, "dispatching command");

    match command {
        "add" => cmd_add(store, &inv.command_args, now),
        "delete" => cmd_delete(store, &inv.command_args),
        "toggle" => cmd_toggle(store, &inv.command_args),
        "edit" => cmd_edit(store, &inv.command_args),
        "clear-completed" => cmd_clear_completed(store),
        "list" => cmd_list(store, renderer, &inv.command_args),
        "html" => cmd_html(store, &inv.command_args),
        "export" => cmd_export(store),
        "calc" => cmd_calc(renderer, &inv.command_args),
        "help" => cmd_help(),
        "version" => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => Err(anyhow!("unknown command: {other}")),
    }
}

#[instrument(skip(store, args, now))]
fn cmd_add(
    store: &mut TodoStore,
    args: &[String],
    now: chrono::DateTime<Utc>,
) -> anyhow::Result<()> {
    info!("command add");

    if args.is_empty() {
        return Err(anyhow!("add requires text argument"));
    }
    let text = args.join(" ");

    match store.add(&text, now)? {
        Some(id) => println!("Created task {id}."),
        None => debug!("nothing to add"),
    }
    Ok(())
}

#[instrument(skip(store, args))]
fn cmd_delete(store: &mut TodoStore, args: &[String]) -> anyhow::Result<()> {
    info!("command delete");

    let id = parse_id(args)?;
    let removed = store.delete(id)?;
    println!("Deleted {removed} task(s).");
    Ok(())
}

#[instrument(skip(store, args))]
fn cmd_toggle(store: &mut TodoStore, args: &[String]) -> anyhow::Result<()> {
    info!("command toggle");

    let id = parse_id(args)?;
    let toggled = store.toggle(id)?;
    println!("Toggled {toggled} task(s).");
    Ok(())
}

#[instrument(skip(store, args))]
fn cmd_edit(store: &mut TodoStore, args: &[String]) -> anyhow::Result<()> {
    info!("command edit");

    let id = parse_id(args)?;
    let text = args[1..].join(" ");

    match store.edit(id, &text)? {
        EditOutcome::Modified(changed) => println!("Modified {changed} task(s)."),
        EditOutcome::Deleted(removed) => println!("Deleted {removed} task(s)."),
    }
    Ok(())
}

#[instrument(skip(store))]
fn cmd_clear_completed(store: &mut TodoStore) -> anyhow::Result<()> {
    info!("command clear-completed");

    let removed = store.clear_completed()?;
    println!("Cleared {removed} completed task(s).");
    Ok(())
}

#[instrument(skip(store, renderer, args))]
fn cmd_list(store: &mut TodoStore, renderer: &mut Renderer, args: &[String]) -> anyhow::Result<()> {
    info!("command list");

    if let Some(word) = args.first() {
        store.set_filter(ViewFilter::parse(word)?);
    }

    let view = store.filtered_view();
    renderer.print_todo_list(&view, store.active_count())?;
    Ok(())
}

#[instrument(skip(store, args))]
fn cmd_html(store: &mut TodoStore, args: &[String]) -> anyhow::Result<()> {
    info!("command html");

    if let Some(word) = args.first() {
        store.set_filter(ViewFilter::parse(word)?);
    }

    let view = store.filtered_view();
    print!("{}", markup::page_fragment(&view, store.active_count()));
    Ok(())
}

#[instrument(skip(store))]
fn cmd_export(store: &TodoStore) -> anyhow::Result<()> {
    info!("command export");

    let out = serde_json::to_string(store.items())?;
    println!("{out}");
    Ok(())
}

#[instrument(skip(renderer, args))]
fn cmd_calc(renderer: &mut Renderer, args: &[String]) -> anyhow::Result<()> {
    info!("command calc");

    let keys = parse_keys(args)?;
    let mut calc = Calculator::new();
    for key in keys {
        calc.press(key);
    }

    renderer.print_calc_display(calc.display())?;
    Ok(())
}

fn cmd_help() -> anyhow::Result<()> {
    println!(
        "Implemented commands: add, delete, toggle, edit, clear-completed, list, html, export, calc, help, version"
    );
    Ok(())
}

fn parse_id(args: &[String]) -> anyhow::Result<i64> {
    let raw = args.first().ok_or_else(|| anyhow!("missing task id"))?;
    raw.parse::<i64>()
        .with_context(|| format!("invalid task id: {raw}"))
}
