//! Interactive session over the user stores.
//!
//! The stores live as long as the session. Every change re-renders the table
//! from the user store's `watch` channel; mutations re-list the current page.

use std::io::BufRead;
use std::str::FromStr;

use colored::Colorize;
use tracing::debug;

use crate::client::UserService;
use crate::commands::prompt::Prompter;
use crate::error::{AdminError, Result};
use crate::operations::UserOperations;
use crate::output;
use crate::pagination::Pager;
use crate::store::UserListSnapshot;
use crate::types::{NewUser, User, UserPatch};
use crate::validation::{validate, UserForm};

const HELP: &str = "Commands:
  next, n          next page
  prev, p          previous page
  page N           go to page N
  rows N           rows per page (5, 10 or 15)
  refresh, r       fetch the current page again
  add, a           add a user
  edit ID, e ID    edit a user on this page
  delete ID        delete a user on this page
  help, h          show this help
  quit, q          leave the dashboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Next,
    Prev,
    Page(u32),
    Rows(u32),
    Refresh,
    Add,
    Edit(u64),
    Delete(u64),
    Help,
    Quit,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default().to_lowercase();
        let arg = words.next();

        let number = |what: &str| -> std::result::Result<u64, String> {
            arg.ok_or_else(|| format!("'{command}' needs {what}"))?
                .parse::<u64>()
                .map_err(|_| format!("'{command}' needs {what}"))
        };
        let small = |what: &str| -> std::result::Result<u32, String> {
            u32::try_from(number(what)?).map_err(|_| format!("{what} is too large"))
        };

        match command.as_str() {
            "next" | "n" => Ok(Action::Next),
            "prev" | "p" => Ok(Action::Prev),
            "page" => match small("a page number")? {
                0 => Err("pages start at 1".to_string()),
                page => Ok(Action::Page(page)),
            },
            "rows" => Ok(Action::Rows(small("a row count")?)),
            "refresh" | "r" => Ok(Action::Refresh),
            "add" | "a" => Ok(Action::Add),
            "edit" | "e" => Ok(Action::Edit(number("a user id")?)),
            "delete" | "del" => Ok(Action::Delete(number("a user id")?)),
            "help" | "h" | "?" => Ok(Action::Help),
            "quit" | "q" | "exit" => Ok(Action::Quit),
            other => Err(format!("unknown command '{other}', type 'help'")),
        }
    }
}

pub async fn run<S: UserService, R: BufRead>(
    ops: &UserOperations<S>,
    prompter: &mut Prompter<R>,
    mut pager: Pager,
) -> Result<()> {
    let mut view = ops.users().subscribe();

    println!("{}", "User Management".blue().bold());
    println!("{}", "Type 'help' for commands.".bright_black());
    relist(ops, &pager).await;

    loop {
        if view.has_changed().unwrap_or(false) {
            let snapshot = view.borrow_and_update().clone();
            output::print_snapshot(&snapshot, &pager.label(snapshot.total));
        }

        let Some(line) = prompter.line("> ")? else {
            break;
        };
        if line.is_empty() {
            continue;
        }

        let action = match line.parse::<Action>() {
            Ok(action) => action,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        debug!(?action, "dashboard action");

        match action {
            Action::Quit => break,
            Action::Help => println!("{HELP}"),
            Action::Next => {
                if pager.next(ops.users().snapshot().total) {
                    relist(ops, &pager).await;
                } else {
                    println!("Already on the last page");
                }
            }
            Action::Prev => {
                if pager.prev() {
                    relist(ops, &pager).await;
                } else {
                    println!("Already on the first page");
                }
            }
            Action::Page(page) => {
                go_to_page(&mut pager, &ops.users().snapshot(), page);
                relist(ops, &pager).await;
            }
            Action::Rows(rows) if rows == pager.rows_per_page() => {}
            Action::Rows(rows) => match pager.set_rows_per_page(rows) {
                Ok(()) => relist(ops, &pager).await,
                Err(e) => report(&e),
            },
            Action::Refresh => relist(ops, &pager).await,
            Action::Add => add(ops, prompter, &pager).await?,
            Action::Edit(id) => edit(ops, prompter, &pager, id).await?,
            Action::Delete(id) => delete(ops, prompter, &pager, id).await?,
        }
    }

    Ok(())
}

/// Moves to the 1-based `page`, clamped to the last page of a known total.
///
/// A failed List with no rows leaves the total unknown, so no clamping then.
fn go_to_page(pager: &mut Pager, snapshot: &UserListSnapshot, page: u32) {
    let target = page - 1;
    if snapshot.error.is_some() && snapshot.users.is_empty() {
        pager.go_to(target);
        return;
    }

    let last = pager.last_page(snapshot.total);
    pager.go_to(target.min(last));
    if pager.page() < target {
        let plural = if last == 0 { "" } else { "s" };
        println!("There {} only {} page{plural}", if last == 0 { "is" } else { "are" }, last + 1);
    }
}

/// List failures land in the store and show up in the next render.
async fn relist<S: UserService>(ops: &UserOperations<S>, pager: &Pager) {
    if let Err(e) = ops.list(pager.skip(), pager.limit()).await {
        debug!(error = %e, "list failed");
    }
}

fn report(error: &AdminError) {
    if error.is_precondition() {
        println!("{}", error.to_string().yellow());
    } else {
        println!("{} {error}", "Error:".red().bold());
    }
}

fn on_page<S: UserService>(ops: &UserOperations<S>, id: u64) -> Option<User> {
    ops.users()
        .snapshot()
        .users
        .into_iter()
        .find(|user| user.id == id)
}

fn print_form_errors(messages: &[String]) {
    for message in messages {
        println!("  {}", message.red());
    }
}

async fn add<S: UserService, R: BufRead>(
    ops: &UserOperations<S>,
    prompter: &mut Prompter<R>,
    pager: &Pager,
) -> Result<()> {
    let user = NewUser {
        first_name: prompter.with_default("First Name", "")?,
        last_name: prompter.with_default("Last Name", "")?,
        email: prompter.with_default("Email", "")?,
        phone: prompter.with_default("Phone", "")?,
    };

    let messages = validate(UserForm::from(&user));
    if !messages.is_empty() {
        print_form_errors(&messages);
        return Ok(());
    }

    match ops.add(&user).await {
        Ok(created) => {
            println!("User added successfully!");
            if let Err(e) = created.refresh(ops, pager).await {
                debug!(error = %e, "refresh after add failed");
            }
        }
        Err(e) => report(&e),
    }
    Ok(())
}

async fn edit<S: UserService, R: BufRead>(
    ops: &UserOperations<S>,
    prompter: &mut Prompter<R>,
    pager: &Pager,
    id: u64,
) -> Result<()> {
    let Some(user) = on_page(ops, id) else {
        println!("User {id} is not on this page");
        return Ok(());
    };
    ops.select(user);

    let outcome = edit_selected(ops, prompter).await;
    ops.clear_selection();

    match outcome {
        Ok(true) => {
            println!("User edited successfully!");
            relist(ops, pager).await;
        }
        Ok(false) => {}
        Err(e) => report(&e),
    }
    Ok(())
}

/// Asks for new values of the selected user. `Ok(false)` when nothing was sent.
async fn edit_selected<S: UserService, R: BufRead>(
    ops: &UserOperations<S>,
    prompter: &mut Prompter<R>,
) -> Result<bool> {
    let selected = ops.selection().selected().ok_or(AdminError::NoSelection)?;
    println!(
        "{} {}",
        "Editing".bold(),
        format!("#{} {}", selected.id, selected.full_name()).blue()
    );

    let patch = UserPatch {
        first_name: ask_changed(prompter, "First Name", &selected.first_name)?,
        last_name: ask_changed(prompter, "Last Name", &selected.last_name)?,
        email: ask_changed(prompter, "Email", &selected.email)?,
        phone: ask_changed(prompter, "Phone", &selected.phone)?,
        ..UserPatch::default()
    };

    if patch.is_empty() {
        println!("No changes");
        return Ok(false);
    }

    let messages = validate(UserForm::from(&patch.apply_to(&selected)));
    if !messages.is_empty() {
        print_form_errors(&messages);
        return Ok(false);
    }

    ops.update(&patch).await?.into_record();
    Ok(true)
}

/// `Some` only when the answer differs from `current`.
fn ask_changed<R: BufRead>(
    prompter: &mut Prompter<R>,
    label: &str,
    current: &str,
) -> Result<Option<String>> {
    let answer = prompter.with_default(label, current)?;
    Ok((answer != current).then_some(answer))
}

async fn delete<S: UserService, R: BufRead>(
    ops: &UserOperations<S>,
    prompter: &mut Prompter<R>,
    pager: &Pager,
    id: u64,
) -> Result<()> {
    let Some(user) = on_page(ops, id) else {
        println!("User {id} is not on this page");
        return Ok(());
    };

    let question = format!("User with email {} will be deleted. Continue?", user.email);
    if !prompter.confirm(&question)? {
        return Ok(());
    }

    match ops.delete(id).await {
        Ok(deleted) => {
            println!("User deleted successfully!");
            if let Err(e) = deleted.refresh(ops, pager).await {
                debug!(error = %e, "refresh after delete failed");
            }
        }
        Err(e) => {
            println!("User deletion failed. Please try again.");
            report(&e);
        }
    }
    Ok(())
}
