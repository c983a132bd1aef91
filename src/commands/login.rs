use std::io::BufRead;

use colored::Colorize;

use crate::commands::prompt::Prompter;
use crate::error::Result;
use crate::output;
use crate::session::{self, KeyValueStore};

/// Logs in, asking for whatever was not passed on the command line.
///
/// The prompts are pre-filled with the remembered pair, if any.
pub fn login<K: KeyValueStore, R: BufRead>(
    store: &mut K,
    prompter: &mut Prompter<R>,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let (remembered_user, remembered_password) = session::remembered(store).unzip();

    let username = match username {
        Some(username) => username,
        None => prompter.with_default("Username", remembered_user.as_deref().unwrap_or(""))?,
    };
    let password = match password {
        Some(password) => password,
        None => {
            prompter.with_default("Password", remembered_password.as_deref().unwrap_or(""))?
        }
    };

    let session = session::login(store, &username, &password)?;
    output::print_message(&format!("Logged in as {}", session.username));

    Ok(())
}

pub fn logout<K: KeyValueStore>(store: &mut K) -> Result<()> {
    session::logout(store)?;
    output::print_message("Logged out");
    Ok(())
}

pub fn whoami<K: KeyValueStore>(store: &K) -> Result<()> {
    let session = session::require_login(store)?;

    output::print_item(&session, |s| {
        print!("{}", s.username.bold());
        match s.remembered_at {
            Some(at) => {
                let since = format!("(since {})", output::format_relative(at));
                println!(" {}", since.bright_black());
            }
            None => println!(),
        }
    });

    Ok(())
}
