//! Resolve intrinsic functions in a JSON template from the command line.
//!
//! Each invocation runs one pass (parameters, derived resource references or
//! logical id remaps) and prints the rewritten template.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use tracing::info;

use intrinsics::IntrinsicsResolver;
use intrinsics::io::config::load_config;
use intrinsics::io::document::{
    check_depth, load_document, load_id_refs, load_resource_refs, render_document,
    write_document,
};
use intrinsics::logging;

#[derive(Parser)]
#[command(
    name = "intrinsics",
    version,
    about = "Resolve intrinsic functions in JSON templates"
)]
struct Cli {
    /// Resolver configuration (TOML). Defaults apply if the file is missing.
    #[arg(long, global = true, default_value = "intrinsics.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve one pass over a template and print the result.
    Resolve {
        /// Template to resolve (JSON).
        template: PathBuf,

        #[arg(short, long, value_enum, default_value_t = Mode::Parameters)]
        mode: Mode,

        /// Parameter values (JSON object). Defaults to `{}`.
        #[arg(short, long)]
        parameters: Option<PathBuf>,

        /// Derived resource references (`{"LogicalId": {"Property": "Value"}}`).
        #[arg(long)]
        resource_refs: Option<PathBuf>,

        /// Logical id remap (`{"OldId": "NewId"}`).
        #[arg(long)]
        id_refs: Option<PathBuf>,

        /// Write the result here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the configured intrinsic function names.
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Parameters,
    ResourceRefs,
    IdRefs,
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Resolve {
            template,
            mode,
            parameters,
            resource_refs,
            id_refs,
            output,
        } => cmd_resolve(
            &cli.config,
            &ResolveArgs {
                template,
                mode,
                parameters,
                resource_refs,
                id_refs,
                output,
            },
        ),
        Command::List => cmd_list(&cli.config),
    }
}

struct ResolveArgs {
    template: PathBuf,
    mode: Mode,
    parameters: Option<PathBuf>,
    resource_refs: Option<PathBuf>,
    id_refs: Option<PathBuf>,
    output: Option<PathBuf>,
}

fn cmd_resolve(config_path: &Path, args: &ResolveArgs) -> Result<()> {
    let cfg = load_config(config_path)?;
    let template = load_document(&args.template)?;
    check_depth(&template, cfg.max_depth)
        .with_context(|| format!("check {}", args.template.display()))?;

    let parameters = match &args.parameters {
        Some(path) => {
            let parameters = load_document(path)?;
            check_depth(&parameters, cfg.max_depth)
                .with_context(|| format!("check {}", path.display()))?;
            parameters
        }
        None => Value::Object(Map::new()),
    };
    let resolver = IntrinsicsResolver::new(Some(parameters), Some(cfg.registry()?))
        .context("build resolver")?;

    let resolved = match args.mode {
        Mode::Parameters => resolver.resolve_parameter_refs(template),
        Mode::ResourceRefs => {
            let Some(path) = &args.resource_refs else {
                bail!("--resource-refs is required for mode resource-refs");
            };
            let refs = load_resource_refs(path)?;
            resolver.resolve_resource_refs(template, &refs)
        }
        Mode::IdRefs => {
            let Some(path) = &args.id_refs else {
                bail!("--id-refs is required for mode id-refs");
            };
            let id_refs = load_id_refs(path)?;
            resolver.resolve_resource_id_refs(template, &id_refs)
        }
    };
    info!(mode = ?args.mode, template = %args.template.display(), "template resolved");

    match &args.output {
        Some(path) => write_document(path, &resolved, cfg.pretty),
        None => {
            let buf = render_document(&resolved, cfg.pretty)?;
            std::io::stdout()
                .write_all(buf.as_bytes())
                .context("write stdout")
        }
    }
}

fn cmd_list(config_path: &Path) -> Result<()> {
    let cfg = load_config(config_path)?;
    for name in cfg.registry()?.names() {
        println!("{}", name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_resolve_defaults_to_parameters() {
        let cli = Cli::parse_from(["intrinsics", "resolve", "template.json"]);
        assert_eq!(cli.config, PathBuf::from("intrinsics.toml"));
        assert!(matches!(
            cli.command,
            Command::Resolve {
                mode: Mode::Parameters,
                parameters: None,
                ..
            }
        ));
    }

    #[test]
    fn parse_resolve_resource_refs_mode() {
        let cli = Cli::parse_from([
            "intrinsics",
            "resolve",
            "template.json",
            "--mode",
            "resource-refs",
            "--resource-refs",
            "refs.json",
        ]);
        match cli.command {
            Command::Resolve {
                mode,
                resource_refs,
                ..
            } => {
                assert_eq!(mode, Mode::ResourceRefs);
                assert_eq!(resource_refs, Some(PathBuf::from("refs.json")));
            }
            Command::List => panic!("expected resolve"),
        }
    }

    #[test]
    fn parse_list() {
        let cli = Cli::parse_from(["intrinsics", "list", "--config", "custom.toml"]);
        assert!(matches!(cli.command, Command::List));
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
    }
}
