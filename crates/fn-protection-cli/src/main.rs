//! fn-protection - deletion protection for composite resources via Usages

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

mod commands;
mod display;
mod error;
mod exit_codes;
mod function;

use commands::render::OutputFormat;
use function::InputOverrides;

#[derive(Parser)]
#[command(name = "fn-protection")]
#[command(version)]
#[command(about = "Protects composite and composed resources from deletion with Usages", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the function against a request and print the response
    Render {
        /// Request document (YAML or JSON)
        request: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        output: OutputFormat,

        #[command(flatten)]
        input: InputArgs,

        /// Exit with an error when the response carries a fatal result
        #[arg(long)]
        fail_on_fatal: bool,
    },

    /// Show which resources a request would protect
    Inspect {
        /// Request document (YAML or JSON)
        request: PathBuf,

        #[command(flatten)]
        input: InputArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the Usage name derived for a resource
    Name {
        /// Resource kind
        kind: String,

        /// Resource name
        name: String,

        /// Resource namespace (omit for cluster-scoped resources)
        #[arg(short, long)]
        namespace: Option<String>,
    },
}

/// Overrides for the function input carried by the request
#[derive(Args)]
struct InputArgs {
    /// Response cache TTL, e.g. 5m or 90s
    #[arg(long, env = "FN_PROTECTION_CACHE_TTL")]
    cache_ttl: Option<String>,

    /// Emit legacy apiextensions.crossplane.io Usages (`--enable-v1-mode=false` forces current ones)
    #[arg(
        long,
        env = "FN_PROTECTION_ENABLE_V1_MODE",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    enable_v1_mode: Option<bool>,
}

impl From<InputArgs> for InputOverrides {
    fn from(args: InputArgs) -> Self {
        Self {
            cache_ttl: args.cache_ttl,
            enable_v1_mode: args.enable_v1_mode,
        }
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let env = std::env::var("FN_PROTECTION_LOG").unwrap_or_else(|_| default.to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help and --version land here too
            let code = if err.use_stderr() {
                exit_codes::USAGE_ERROR
            } else {
                0
            };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    init_tracing(cli.debug);

    let result = match cli.command {
        Commands::Render {
            request,
            output,
            input,
            fail_on_fatal,
        } => commands::render::run(&request, output, &input.into(), fail_on_fatal),

        Commands::Inspect {
            request,
            input,
            json,
        } => commands::inspect::run(&request, &input.into(), json),

        Commands::Name {
            kind,
            name,
            namespace,
        } => commands::name::run(&kind, &name, namespace.as_deref()),
    };

    if let Err(err) = result {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}
