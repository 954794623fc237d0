//! App payload command

use crate::cli::{AppPayloadArgs, AppTarget};
use crate::utils::load_app;
use anyhow::Result;
use appdeck_core::payload::CreateAppVariables;
use tracing::debug;

pub async fn run(args: AppPayloadArgs, target: &AppTarget) -> Result<()> {
    let app = load_app(target).await?;
    let variables = CreateAppVariables::from_app(args.org, &app, args.app_type);
    debug!("Built app creation variables for {}", app.name);

    println!("{}", serde_json::to_string_pretty(&variables)?);
    Ok(())
}
