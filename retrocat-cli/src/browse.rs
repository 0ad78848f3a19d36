use std::io::{self, Write};

use colored::*;
use retrocat_listing::{Completion, DataTable, SortOrder, TableError};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render;

/// One line of input in the interactive browser.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseCommand {
    Next,
    Prev,
    Page(u32),
    Sort(String, Option<SortOrder>),
    Filter(String, String),
    Clear(String),
    Reset,
    Limit(u32),
    Refresh,
    Filters,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<BrowseCommand, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let number = |what: &str| {
        rest.parse::<u32>()
            .map_err(|_| format!("{what} needs a number, got '{rest}'"))
    };

    match word {
        "n" | "next" | "" => Ok(BrowseCommand::Next),
        "p" | "prev" => Ok(BrowseCommand::Prev),
        "g" | "page" => number("page").map(BrowseCommand::Page),
        "l" | "limit" => number("limit").map(BrowseCommand::Limit),
        "s" | "sort" => {
            let mut parts = rest.split_whitespace();
            let field = parts.next().ok_or("sort needs a field name")?;
            let order = parts
                .next()
                .map(|raw| raw.parse::<SortOrder>().map_err(|err| err.to_string()))
                .transpose()?;
            Ok(BrowseCommand::Sort(field.to_string(), order))
        }
        "f" | "filter" => {
            let (key, value) = rest
                .split_once('=')
                .ok_or("filter expects key=value")?;
            Ok(BrowseCommand::Filter(key.trim().to_string(), value.trim().to_string()))
        }
        "x" | "clear" if !rest.is_empty() => Ok(BrowseCommand::Clear(rest.to_string())),
        "r" | "reset" => Ok(BrowseCommand::Reset),
        "reload" | "refresh" => Ok(BrowseCommand::Refresh),
        "filters" => Ok(BrowseCommand::Filters),
        "h" | "help" | "?" => Ok(BrowseCommand::Help),
        "q" | "quit" | "exit" => Ok(BrowseCommand::Quit),
        other => Err(format!("unknown command '{other}', type 'help'")),
    }
}

fn print_help() {
    println!(
        "{}",
        "commands: n(ext) · p(rev) · g <page> · s <field> [asc|desc] · f key=value · x <key> · r(eset) · l <limit> · filters · reload · q(uit)"
            .dimmed()
    );
}

async fn apply(table: &mut DataTable, command: BrowseCommand) -> Result<Option<Completion>, TableError> {
    let completion = match command {
        BrowseCommand::Next => table.next_page().await?,
        BrowseCommand::Prev => table.prev_page().await?,
        BrowseCommand::Page(page) => table.go_to_page(page).await?,
        BrowseCommand::Sort(field, Some(order)) => table.sort_by(&field, order).await?,
        BrowseCommand::Sort(field, None) => table.toggle_sort(&field).await?,
        BrowseCommand::Filter(key, value) => table.set_filter_text(&key, &value).await?,
        BrowseCommand::Clear(key) => table.clear_filter(&key).await?,
        BrowseCommand::Reset => table.reset_filters().await?,
        BrowseCommand::Limit(limit) => table.set_limit(limit).await?,
        BrowseCommand::Refresh => table.refresh().await?,
        BrowseCommand::Filters => {
            render::print_active_filters(table);
            return Ok(None);
        }
        BrowseCommand::Help => {
            print_help();
            return Ok(None);
        }
        BrowseCommand::Quit => return Ok(None),
    };
    Ok(Some(completion))
}

/// Interactive pager over one table, driven by commands read from stdin.
pub async fn run(table: &mut DataTable) -> anyhow::Result<()> {
    table.load().await?;
    render::print_table(table);
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", ">".cyan().bold());
        io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message.red());
                continue;
            }
        };
        if command == BrowseCommand::Quit {
            break;
        }
        match apply(table, command).await {
            Ok(Some(_)) => render::print_table(table),
            Ok(None) => {}
            Err(err) => println!("{} {}", "✘".red().bold(), err.to_string().red()),
        }
    }
    Ok(())
}
