//! Command handlers: wire the CLI onto the expander, schema source, and
//! runner.

use crate::cli::{FormatArg, UnknownFieldsArg};
use crate::config::App;
use crate::error::Result;
use crate::expand::{JsonnetCli, ObjectExpander};
use crate::runner::{RunOptions, ValidationRunner};
use crate::schema::source::{HttpDiscoveryClient, SchemaSource};
use crate::schema::validator::ValidationOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Everything `kubecheck validate` needs beyond the environment name.
pub struct ValidateArgs {
    pub env: String,
    pub components: Vec<String>,
    pub app_dir: Option<PathBuf>,
    pub unknown_fields: UnknownFieldsArg,
    pub format: FormatArg,
    pub parallel: bool,
    pub timeout: Duration,
}

/// Expand and validate; returns whether every object passed.
pub fn handle_validate(args: &ValidateArgs, out: &mut dyn Write) -> Result<bool> {
    let cwd = resolve_dir(args.app_dir.as_deref())?;
    let app = App::load(&cwd)?;
    let env = app.environment(&args.env)?.clone();

    let evaluator = JsonnetCli::new();
    let expander = ObjectExpander::new(&app, &evaluator);
    let objects = expander.expand(&env, &args.components)?;

    let client = HttpDiscoveryClient::with_timeout(args.timeout)?;
    let source = SchemaSource::new(env.server.clone(), Box::new(client));

    let options = RunOptions {
        validation: ValidationOptions {
            unknown_fields: args.unknown_fields.into(),
        },
        format: args.format.into(),
        parallel: args.parallel,
    };
    ValidationRunner::new(&source, options).run(&objects, out)
}

/// List configured environments.
pub fn handle_env_list(app_dir: Option<&std::path::Path>, out: &mut dyn Write) -> Result<()> {
    let cwd = resolve_dir(app_dir)?;
    let app = App::load(&cwd)?;

    for (name, env) in &app.config.environments {
        writeln!(out, "{}\t{}", name, env.server)?;
    }
    Ok(())
}

fn resolve_dir(app_dir: Option<&std::path::Path>) -> Result<PathBuf> {
    match app_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Ok(std::env::current_dir()?),
    }
}
