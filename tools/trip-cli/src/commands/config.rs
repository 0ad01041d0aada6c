//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::generate_default_config;
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("[api]");
    ctx.output.kv("base_url", &ctx.config.api.base_url);
    ctx.output.kv(
        "api_key",
        if ctx.config.api.api_key.is_some() {
            "(set)"
        } else {
            "(not set)"
        },
    );
    ctx.output
        .kv("timeout_secs", &ctx.config.api.timeout_secs.to_string());

    ctx.output.info("[session]");
    ctx.output.kv(
        "login_redirect_delay_ms",
        &ctx.config.session.login_redirect_delay_ms.to_string(),
    );

    ctx.output.info("[storage]");
    ctx.output
        .kv("path", &ctx.config.storage_path().display().to_string());

    if !ctx.config.environments.is_empty() {
        let mut names: Vec<&str> = ctx.config.environments.keys().map(String::as_str).collect();
        names.sort_unstable();
        ctx.output.info("[environments]");
        for name in names {
            ctx.output.list_item(name);
        }
    }

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("trip.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output
        .success(&format!("Created config file: {}", config_path.display()));

    Ok(())
}
