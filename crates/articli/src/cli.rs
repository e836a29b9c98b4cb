use std::fmt;

use clap::{ArgAction, ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

use crate::client::{ArtifactoryClient, Transport, UreqTransport};
use crate::error::{Error, Result};
use crate::{format, validate};

const USAGE: &str =
    "Command argument is needed. \nRun 'articli -h' for a list of available commands";

#[derive(Parser, Debug)]
#[command(name = "articli", version, about = "Artifactory CLI tool.")]
#[command(group(ArgGroup::new("command").multiple(false)))]
struct Cli {
    /// A key for Artifactory API authentication
    #[arg(short = 'k', long = "api_key", help_heading = "Required parameters")]
    api_key: String,

    /// A base URL to the Artifactory API
    #[arg(short = 'l', long = "base_url", help_heading = "Required parameters")]
    base_url: String,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Sends a ping request
    #[arg(long, group = "command", help_heading = "Available commands")]
    ping: bool,

    /// Retrieve information about the current Artifactory version, revision, and currently installed Add-ons
    #[arg(
        long = "system_version",
        group = "command",
        help_heading = "Available commands"
    )]
    system_version: bool,

    /// Returns storage summary information regarding binaries, file store and repositories
    #[arg(
        long = "storage_info",
        group = "command",
        help_heading = "Available commands"
    )]
    storage_info: bool,

    /// Creates a new user in Artifactory or replaces an existing user
    #[arg(
        long = "create_user",
        num_args = 3,
        value_names = ["USERNAME", "PASSWORD", "EMAIL"],
        action = ArgAction::Set,
        group = "command",
        help_heading = "Available commands"
    )]
    create_user: Option<Vec<String>>,

    /// Removes an Artifactory user
    #[arg(
        long = "delete_user",
        value_name = "USERNAME",
        group = "command",
        help_heading = "Available commands"
    )]
    delete_user: Option<String>,
}

impl Cli {
    /// At most one command flag survives parsing; they share one arg group.
    fn into_command(self) -> Result<Option<Command>> {
        if self.ping {
            return Ok(Some(Command::Ping));
        }
        if self.system_version {
            return Ok(Some(Command::SystemVersion));
        }
        if self.storage_info {
            return Ok(Some(Command::StorageInfo));
        }
        if let Some(values) = self.create_user {
            let Ok([username, password, email]) = <[String; 3]>::try_from(values) else {
                return Err(Error::invalid(
                    "--create_user expects exactly a username, a password and an email",
                ));
            };
            return Ok(Some(Command::CreateUser(NewUser {
                username,
                password,
                email,
            })));
        }
        Ok(self
            .delete_user
            .map(|username| Command::DeleteUser { username }))
    }
}

/// One operation against the Artifactory REST API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Ping,
    SystemVersion,
    StorageInfo,
    CreateUser(NewUser),
    DeleteUser { username: String },
}

#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("email", &self.email)
            .finish()
    }
}

/// Run a single command and produce the text to print.
pub fn dispatch<T: Transport>(client: &ArtifactoryClient<T>, command: Command) -> Result<String> {
    match command {
        Command::Ping => client.ping(),
        Command::SystemVersion => Ok(format::pretty(&client.system_version()?)?),
        Command::StorageInfo => Ok(format::pretty(&client.storage_info()?)?),
        Command::CreateUser(user) => {
            validate::email(&user.email)?;
            client.create_user(&user.username, &user.password, &user.email)?;
            Ok("OK".to_string())
        }
        Command::DeleteUser { username } => client.delete_user(&username),
    }
}

fn execute<T: Transport>(cli: Cli, transport: T) -> Result<String> {
    let base_url = validate::base_url(&cli.base_url)?;
    let api_key = validate::api_key(&cli.api_key)?;

    let Some(command) = cli.into_command()? else {
        return Ok(USAGE.to_string());
    };
    tracing::info!(?command, "dispatching");

    let client = ArtifactoryClient::with_transport(transport, &base_url, &api_key);
    dispatch(&client, command)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Only fails if a subscriber is already installed, which is fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Parse CLI arguments, execute the selected Artifactory command and print its output.
pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    init_tracing(cli.verbose);
    tracing::debug!("articli v{} starting", env!("CARGO_PKG_VERSION"));

    let output = execute(cli, UreqTransport::default())?;
    println!("{output}");
    Ok(())
}
