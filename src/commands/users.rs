use std::io::BufRead;

use crate::cli::{UserAddArgs, UserEditArgs, UserListArgs};
use crate::client::UserService;
use crate::commands::prompt::Prompter;
use crate::config::Config;
use crate::error::Result;
use crate::operations::UserOperations;
use crate::output;
use crate::pagination::Pager;
use crate::types::NewUser;
use crate::validation::{ensure_valid, UserForm};

pub fn pager_for(config: &Config, args: UserListArgs) -> Result<Pager> {
    let mut pager = Pager::new(config.resolve_rows_per_page(args.rows)?)?;
    pager.go_to(args.page.saturating_sub(1));
    Ok(pager)
}

pub async fn list<S: UserService>(
    ops: &UserOperations<S>,
    config: &Config,
    args: UserListArgs,
) -> Result<()> {
    let pager = pager_for(config, args)?;
    ops.list(pager.skip(), pager.limit()).await?;

    let snapshot = ops.users().snapshot();
    output::print_snapshot(&snapshot, &pager.label(snapshot.total));

    Ok(())
}

pub async fn show<S: UserService>(ops: &UserOperations<S>, id: u64) -> Result<()> {
    let user = ops.fetch(id).await?;
    output::print_user(&user);
    Ok(())
}

pub async fn add<S: UserService>(ops: &UserOperations<S>, args: UserAddArgs) -> Result<()> {
    let user = NewUser::from(args);
    ensure_valid(UserForm::from(&user))?;

    // One-shot command: there is no list on screen to refresh.
    let created = ops.add(&user).await?.into_record();

    match created.id {
        Some(id) => output::print_message(&format!("User added successfully! (id {id})")),
        None => output::print_message("User added successfully!"),
    }

    Ok(())
}

pub async fn edit<S: UserService>(ops: &UserOperations<S>, args: UserEditArgs) -> Result<()> {
    let patch = args.patch();
    if patch.is_empty() {
        output::print_message("No updates specified");
        return Ok(());
    }

    let current = ops.select_remote(args.id).await?;
    let result = match ensure_valid(UserForm::from(&patch.apply_to(&current))) {
        Ok(()) => ops.update(&patch).await.map(|m| m.into_record()),
        Err(e) => Err(e),
    };
    ops.clear_selection();

    let updated = result?;
    output::print_message("User edited successfully!");
    output::print_user(&updated);

    Ok(())
}

pub async fn delete<S: UserService, R: BufRead>(
    ops: &UserOperations<S>,
    prompter: &mut Prompter<R>,
    id: u64,
    yes: bool,
) -> Result<()> {
    if !yes {
        let user = ops.fetch(id).await?;
        let question = format!("User with email {} will be deleted. Continue?", user.email);
        if !prompter.confirm(&question)? {
            output::print_message("Aborted.");
            return Ok(());
        }
    }

    let deleted = ops.delete(id).await?.into_record();
    output::print_message(&format!("User {deleted} deleted successfully!"));

    Ok(())
}
