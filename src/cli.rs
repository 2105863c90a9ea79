use crate::report::OutputFormat;
use crate::schema::validator::UnknownFieldPolicy;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kubecheck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check generated component manifests against the server's API")]
#[command(
    long_about = "Expands the application's component manifests for a named environment and \
checks each resulting object against the Kubernetes API schema published by that \
environment's server. Nothing is applied; the cluster is only asked for its schema."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Expand an environment's components and validate them against the
    /// cluster schema
    Validate {
        /// Environment name; use `kubecheck env list` to see available
        /// environments
        #[arg(value_name = "ENV_NAME")]
        env: String,

        /// Only validate the named component(s); may be repeated
        #[arg(short = 'c', long = "component", value_name = "COMPONENT")]
        components: Vec<String>,

        /// Application root directory (defaults to the current directory)
        #[arg(long, value_name = "DIR")]
        app_dir: Option<PathBuf>,

        /// How to report fields the schema does not declare
        #[arg(long, value_enum, default_value = "warn")]
        unknown_fields: UnknownFieldsArg,

        /// Report output format
        #[arg(long, value_enum, default_value = "plain")]
        format: FormatArg,

        /// Validate objects on parallel workers
        #[arg(long)]
        parallel: bool,

        /// Timeout for schema discovery requests, in seconds
        #[arg(long, value_name = "SECONDS", default_value_t = 30)]
        timeout: u64,
    },

    /// Environment commands
    Env {
        #[command(subcommand)]
        command: EnvCommand,
    },
}

#[derive(Subcommand)]
pub enum EnvCommand {
    /// List the environments configured in app.yaml
    List {
        /// Application root directory (defaults to the current directory)
        #[arg(long, value_name = "DIR")]
        app_dir: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnknownFieldsArg {
    Error,
    Warn,
    Ignore,
}

impl From<UnknownFieldsArg> for UnknownFieldPolicy {
    fn from(arg: UnknownFieldsArg) -> Self {
        match arg {
            UnknownFieldsArg::Error => Self::Error,
            UnknownFieldsArg::Warn => Self::Warn,
            UnknownFieldsArg::Ignore => Self::Ignore,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Plain,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Plain => Self::Plain,
            FormatArg::Json => Self::Json,
        }
    }
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
