//! Keyconf CLI — entry point.
//!
//! Builds a configuration tree from the command line, applies settings, then
//! prints the tree or answers a single lookup.
//!
//! # Examples
//!
//! - `keyconf -c sub sub_leaf=green stem=brown` — print the resulting tree
//! - `keyconf -c net.tls -a cert=net_tls_cert cert=server.pem --get net_tls_cert`
//! - `keyconf -c sub --env-prefix APP_ --check sub_leaf`

mod helpers;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use keyconf_core::config::{apply_env, parse_alias, parse_assignment};
use keyconf_core::Configuration;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Keyconf — hierarchical key/value configuration with prefix routing
#[derive(Parser, Debug)]
#[command(name = "keyconf", version, about, long_about = None)]
struct Cli {
    /// Settings as KEY=VALUE (VALUE is parsed as JSON when possible)
    assignments: Vec<String>,

    /// Add a component; dotted paths nest (e.g. "net.tls")
    #[arg(short, long = "component", value_name = "PATH")]
    components: Vec<String>,

    /// Define an alias on the top-level node
    #[arg(short, long = "alias", value_name = "ALIAS=TARGET")]
    aliases: Vec<String>,

    /// Load settings from environment variables with this prefix first
    #[arg(long, value_name = "PREFIX")]
    env_prefix: Option<String>,

    /// Remove keys after the assignments are applied
    #[arg(short, long = "unset", value_name = "KEY")]
    unset: Vec<String>,

    /// Print a single resolved value as JSON
    #[arg(short, long, value_name = "KEY", conflicts_with = "check")]
    get: Option<String>,

    /// Print whether a key is configured
    #[arg(long, value_name = "KEY")]
    check: Option<String>,

    /// Print the tree as JSON
    #[arg(long, default_value_t = false, conflicts_with_all = ["get", "check"])]
    json: bool,

    /// Enable debug logging
    #[arg(long, default_value_t = false)]
    logs: bool,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.logs);

    let root = build_tree(&cli)?;

    if let Some(key) = &cli.get {
        let value = root
            .get_config(key)
            .with_context(|| format!("failed to read '{key}'"))?;
        println!("{value}");
    } else if let Some(key) = &cli.check {
        println!("{}", root.is_configured(key));
    } else if cli.json {
        println!("{}", serde_json::to_string_pretty(&root.snapshot())?);
    } else {
        print!("{}", helpers::render_tree(&root));
    }

    Ok(())
}

/// Build the tree: components, aliases, environment, assignments, removals.
fn build_tree(cli: &Cli) -> Result<Configuration> {
    let root = Configuration::new();

    for path in &cli.components {
        helpers::add_component_path(&root, path)?;
    }

    for raw in &cli.aliases {
        let alias = parse_alias(raw).context("bad --alias")?;
        root.set_aliases([alias]);
    }

    if let Some(prefix) = &cli.env_prefix {
        let count = apply_env(&root, prefix);
        info!(prefix = %prefix, count = count, "applied environment settings");
    }

    let assignments = cli
        .assignments
        .iter()
        .map(|raw| parse_assignment(raw))
        .collect::<Result<Vec<_>, _>>()
        .context("bad assignment")?;
    root.configure(assignments);

    root.unconfigure(&cli.unset);

    Ok(root)
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("keyconf=debug,keyconf_core=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
