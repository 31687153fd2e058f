use clap::{Parser, Subcommand};
use collector_core::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "collector")]
#[command(version)]
#[command(about = "Sync document directories as device collections", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the content catalog database
    #[arg(short = 'c', long = "catalog", value_name = "PATH")]
    pub catalog: Option<String>,

    /// Documents directory to scan
    #[arg(short = 'r', long = "root", value_name = "PATH")]
    pub root: Option<String>,

    /// Content manager change endpoint
    #[arg(short = 'u', long = "url", value_name = "URL")]
    pub url: Option<String>,

    /// Remove all collections known to the catalog
    #[arg(long)]
    pub remove_all: bool,

    /// Show collections holding a single book in the home screen
    #[arg(long)]
    pub force_visible: bool,

    /// Print the change request instead of committing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short = 'd', long)]
    pub debug: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the effective configuration
    PrintConfig,
}

impl Cli {
    /// Apply command line overrides on top of the loaded configuration.
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(catalog) = &self.catalog {
            config.catalog_path = catalog.clone();
        }
        if let Some(root) = &self.root {
            config.documents_root = root.clone();
        }
        if let Some(url) = &self.url {
            config.manager_url = url.clone();
        }
        config.remove_all |= self.remove_all;
        config.force_visible |= self.force_visible;
        config.dry_run |= self.dry_run;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "collector",
            "--catalog",
            "/tmp/cc.db",
            "-r",
            "/tmp/docs",
            "--force-visible",
            "-n",
        ]);
        let config = cli.apply(AppConfig::default());

        assert_eq!(config.catalog_path, "/tmp/cc.db");
        assert_eq!(config.documents_root, "/tmp/docs");
        assert!(config.force_visible);
        assert!(config.dry_run);
        assert!(!config.remove_all);
        assert_eq!(config.manager_url, AppConfig::default().manager_url);
    }

    #[test]
    fn test_print_config_subcommand() {
        let cli = Cli::parse_from(["collector", "print-config"]);
        assert!(matches!(cli.command, Some(Commands::PrintConfig)));
    }
}
