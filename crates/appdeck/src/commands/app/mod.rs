//! App commands: info, config and payload

mod config;
mod info;
mod payload;

use crate::cli::{AppCommands, AppConfigCommands, AppTarget};
use anyhow::Result;

pub async fn run(cmd: AppCommands, target: AppTarget) -> Result<()> {
    match cmd {
        AppCommands::Info(args) => info::run(args, &target).await,
        AppCommands::Config(config_cmd) => match config_cmd {
            AppConfigCommands::Use(args) => config::use_config(args, &target),
            AppConfigCommands::Validate => config::validate(&target),
            AppConfigCommands::Show(args) => config::show(args, &target),
        },
        AppCommands::Payload(args) => payload::run(args, &target).await,
    }
}
