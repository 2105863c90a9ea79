use clap::Parser;
use kubecheck::cli::{Cli, Commands, EnvCommand};
use kubecheck::handlers::{handle_env_list, handle_validate, ValidateArgs};
use std::io;
use std::process;
use std::time::Duration;

// Exit codes: 0 all objects valid, 1 validation findings, 2 fatal failure.
const EXIT_FINDINGS: i32 = 1;
const EXIT_FATAL: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.init_logging();

    let mut stdout = io::stdout();

    let outcome = match cli.command {
        Commands::Validate {
            env,
            components,
            app_dir,
            unknown_fields,
            format,
            parallel,
            timeout,
        } => {
            let args = ValidateArgs {
                env,
                components,
                app_dir,
                unknown_fields,
                format,
                parallel,
                timeout: Duration::from_secs(timeout),
            };
            handle_validate(&args, &mut stdout)
        }
        Commands::Env { command } => match command {
            EnvCommand::List { app_dir } => {
                handle_env_list(app_dir.as_deref(), &mut stdout).map(|()| true)
            }
        },
    };

    match outcome {
        Ok(true) => {}
        Ok(false) => process::exit(EXIT_FINDINGS),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_FATAL);
        }
    }
}
