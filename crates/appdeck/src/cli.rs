//! CLI argument parsing with clap

use appdeck_core::payload::AppType;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// appdeck - Build, validate and inspect embedded storefront apps
#[derive(Parser, Debug)]
#[command(name = "appdeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The path to your app directory
    #[arg(long, global = true, env = "APPDECK_PATH")]
    pub path: Option<Utf8PathBuf>,

    /// The name of the app configuration ('shop.app.staging.toml' or 'staging')
    #[arg(short, long, global = true, env = "APPDECK_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// App commands
    #[command(subcommand)]
    App(AppCommands),

    /// Create a new app project
    Init(InitArgs),

    /// Show version information
    Version(VersionArgs),
}

impl Commands {
    /// Full command name, used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Commands::App(AppCommands::Info(_)) => "app info",
            Commands::App(AppCommands::Config(AppConfigCommands::Use(_))) => "app config use",
            Commands::App(AppCommands::Config(AppConfigCommands::Validate)) => {
                "app config validate"
            }
            Commands::App(AppCommands::Config(AppConfigCommands::Show(_))) => "app config show",
            Commands::App(AppCommands::Payload(_)) => "app payload",
            Commands::Init(_) => "init",
            Commands::Version(_) => "version",
        }
    }
}

/// Options shared by every app command
#[derive(Debug, Clone, Default)]
pub struct AppTarget {
    pub path: Option<Utf8PathBuf>,
    pub config: Option<String>,
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// App commands
#[derive(Subcommand, Debug)]
pub enum AppCommands {
    /// Print basic information about your app and extensions
    Info(AppInfoArgs),

    /// App configuration management
    #[command(subcommand)]
    Config(AppConfigCommands),

    /// Print the variables used to create the app on the platform
    Payload(AppPayloadArgs),
}

#[derive(Args, Debug)]
pub struct AppInfoArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output environment variables necessary for running and deploying web/
    #[arg(long)]
    pub web_env: bool,
}

#[derive(Args, Debug)]
pub struct AppPayloadArgs {
    /// Organization that will own the app
    #[arg(long)]
    pub org: u64,

    /// Kind of app: public, custom or undecided
    #[arg(long, default_value = "public")]
    pub app_type: AppType,
}

#[derive(Subcommand, Debug)]
pub enum AppConfigCommands {
    /// Activate an app configuration
    Use(ConfigUseArgs),

    /// Check the app configuration against its schema
    Validate,

    /// Show the classified app configuration
    Show(ConfigShowArgs),
}

#[derive(Args, Debug)]
pub struct ConfigUseArgs {
    /// The name of the app configuration. Can be 'shop.app.staging.toml' or simply 'staging'
    pub name: Option<String>,

    /// Reset current configuration
    #[arg(long, conflicts_with = "name")]
    pub reset: bool,
}

#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// App name
    #[arg(short, long)]
    pub name: Option<String>,

    /// The app template: remix, none or a repository URL
    #[arg(short, long)]
    pub template: Option<String>,
}
