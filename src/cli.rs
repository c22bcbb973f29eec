use crate::display::terminal_styler;
use crate::errors::{CliError, Result};
use crate::treeview::{print_tree, TreeOptions};
use clap::Parser;
use lb_api::{CloudConfig, Connection, DEFAULT_CLOUD};
use lb_core::DisplayMode;
use log::{debug, info, LevelFilter};
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[command(name = "lb-treeview")]
#[command(about = "Display a tree view of OpenStack loadbalancers, pools, and members")]
#[command(version)]
pub struct Cli {
    /// Filter by specific project ID (optional)
    #[arg(long)]
    pub project_id: Option<String>,

    /// Cloud name from clouds.yaml ("envvars" reads OS_* variables)
    #[arg(long, env = "OS_CLOUD", default_value = DEFAULT_CLOUD)]
    pub cloud: String,

    /// Filter mode: only show problematic members (not ACTIVE/ONLINE) and pools with no members
    #[arg(long)]
    pub filter: bool,

    /// Collapse mode: only show pool names without querying members (faster)
    #[arg(long)]
    pub collapse: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    pub fn tree_options(&self) -> TreeOptions {
        TreeOptions {
            project_id: self.project_id.clone(),
            mode: DisplayMode::new(self.filter, self.collapse),
        }
    }

    /// Default log level, overridden by `RUST_LOG`
    pub fn log_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Error
        }
    }
}

pub fn init_logging(level: LevelFilter) {
    let env = env_logger::Env::default().default_filter_or(level.as_str().to_lowercase());
    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

pub async fn run(cli: Cli) -> Result<()> {
    let options = cli.tree_options();

    let config = CloudConfig::load(&cli.cloud).map_err(|e| CliError::Connection(e.into()))?;
    let connection = Connection::connect(&config)
        .await
        .map_err(CliError::Connection)?;
    info!(
        "Connected to cloud '{}' at {}",
        connection.cloud(),
        connection.endpoint()
    );

    let mut out = io::stdout();
    let summary = print_tree(&connection, &options, terminal_styler(), &mut out).await?;
    out.flush()?;

    debug!(
        "Rendered {} of {} load balancers",
        summary.rendered, summary.load_balancers
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["lb-treeview"]).unwrap();
        // OS_CLOUD may be set in the test environment
        if std::env::var_os("OS_CLOUD").is_none() {
            assert_eq!(cli.cloud, "envvars");
        }
        assert!(cli.project_id.is_none());
        assert_eq!(cli.tree_options().mode, DisplayMode::default());
        assert_eq!(cli.log_level(), LevelFilter::Error);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "lb-treeview",
            "--project-id",
            "abc123",
            "--cloud",
            "prod",
            "--filter",
            "--collapse",
            "--debug",
        ])
        .unwrap();

        assert_eq!(cli.cloud, "prod");
        let options = cli.tree_options();
        assert_eq!(options.project_id.as_deref(), Some("abc123"));
        assert_eq!(options.mode, DisplayMode::new(true, true));
        assert_eq!(cli.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["lb-treeview", "--verbose-tree"]).is_err());
    }
}
