use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::types::{NewUser, UserPatch};

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Compact,
}

#[derive(Parser)]
#[command(name = "useradmin")]
#[command(about = "Manage users of a remote user service", version)]
#[command(after_help = "EXAMPLES:
    useradmin login                     Log in with the demo account
    useradmin users --page 2            List the second page of users
    useradmin users edit 7 --phone 555  Change a user's phone
    useradmin dashboard                 Browse and edit users interactively")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json, compact)
    #[arg(long, short = 'o', global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Output as JSON (alias for --format json)
    #[arg(long, global = true, hide = true)]
    pub json: bool,

    /// Suppress success messages
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Show error causes and more log output (repeat for more)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Get the effective output format, considering --json flag
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage users
    #[command(
        alias = "u",
        after_help = "EXAMPLES:
    useradmin users list --rows 10
    useradmin users show 7
    useradmin users add --first-name Maria --last-name Garcia --email maria@example.com --phone 5551234
    useradmin users edit 7 --first-name Anne
    useradmin users delete 7"
    )]
    Users {
        #[command(subcommand)]
        action: Option<UserCommands>,

        #[command(flatten)]
        list: UserListArgs,
    },
    /// Browse, add, edit and delete users interactively
    #[command(alias = "d")]
    Dashboard,
    /// Log in with the demo account
    #[command(after_help = "EXAMPLES:
    useradmin login
    useradmin login --username hamid --password 123456")]
    Login {
        #[arg(long)]
        username: Option<String>,

        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the remembered login
    Logout,
    /// Show the remembered login
    Whoami,
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    useradmin completions bash > ~/.bash_completion.d/useradmin
    useradmin completions zsh > ~/.zfunc/_useradmin
    useradmin completions fish > ~/.config/fish/completions/useradmin.fish")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    Init,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List one page of users
    List(UserListArgs),
    /// Show one user
    Show {
        /// User id
        id: u64,
    },
    /// Create a user
    Add(UserAddArgs),
    /// Change fields of a user
    Edit(UserEditArgs),
    /// Delete a user
    Delete {
        /// User id
        id: u64,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[derive(Args, Clone, Copy, Default)]
pub struct UserListArgs {
    /// Page number, starting at 1
    #[arg(long, short, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Rows per page (5, 10 or 15; defaults to the configured value)
    #[arg(long, short)]
    pub rows: Option<u32>,
}

#[derive(Args)]
pub struct UserAddArgs {
    #[arg(long)]
    pub first_name: String,

    #[arg(long)]
    pub last_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub phone: String,
}

impl From<UserAddArgs> for NewUser {
    fn from(args: UserAddArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
        }
    }
}

#[derive(Args)]
pub struct UserEditArgs {
    /// User id
    pub id: u64,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    /// Company name
    #[arg(long)]
    pub company: Option<String>,

    /// Address line
    #[arg(long)]
    pub address: Option<String>,
}

impl UserEditArgs {
    pub fn patch(&self) -> UserPatch {
        UserPatch {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            company: self.company.clone(),
            address: self.address.clone(),
        }
    }
}
