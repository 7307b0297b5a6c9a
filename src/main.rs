use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use host_cleanup::cleaner::{self, CleanupReport, HostCleanup};
use host_cleanup::cli::args::{Cli, OutputFormat};
use host_cleanup::cli::{output, prompt};
use host_cleanup::common::config::AgentConfig;
use host_cleanup::common::{logging, permissions};
use host_cleanup::manifest::{self, Section, SkipSet};
use host_cleanup::system::{self, os_family, OsFamily, SystemCommandRunner};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = AgentConfig::load(&cli.config)?;
    let output_file = cli
        .output_file
        .clone()
        .unwrap_or_else(|| config.output_file());
    let input_files = cli
        .input_files
        .clone()
        .unwrap_or_else(|| config.host_check_files());

    // Keep the previous run's log before it is truncated
    let backup = logging::backup_file(&output_file);
    let guard = logging::init_logging(&output_file, cli.verbose)?;
    match backup {
        Ok(Some(backup)) => tracing::info!("Previous log saved to {}", backup.display()),
        Ok(None) => {}
        Err(e) => tracing::warn!("Could not backup file: {}", e),
    }

    let skip: SkipSet = cli.skip.iter().copied().collect();
    if !skip.is_empty() {
        let names: Vec<&str> = cli.skip.iter().map(|s| s.as_str()).collect();
        tracing::info!("Skipping sections: {}", names.join(", "));
    }

    permissions::require_root()?;

    if !cli.silent && !skip.contains(Section::Users) {
        let delete_users = prompt::confirm_user_deletion()
            .context("Failed to read confirmation")?;
        if !delete_users {
            println!(
                "  {} Exiting. Use option --skip=\"users\" to skip deleting users",
                "✗".red()
            );
            // exit() skips destructors; flush the log file first
            drop(guard);
            std::process::exit(1);
        }
    }

    let os_family = config
        .os_family
        .clone()
        .unwrap_or_else(|| OsFamily::detect(std::path::Path::new(os_family::OS_RELEASE_PATH)));
    tracing::info!("OS family: {}", os_family);

    let runner = SystemCommandRunner::new(config.sudo_binary.clone());
    let users = system::platform_resolver();
    let cleanup = HostCleanup::new(&runner, users.as_ref(), os_family, config.layout.clone());

    let mut report = CleanupReport::new();
    match manifest::load_manifest(&input_files) {
        Some(manifest) if manifest.is_empty() => {
            tracing::info!("Host check result lists nothing to clean")
        }
        Some(manifest) => cleanup.run_into(&manifest, &skip, &mut report),
        None => tracing::error!("No host check manifest, skipping cleanup"),
    }

    if !skip.contains(Section::Cache) && config.cache_dir.exists() {
        cleaner::clear_cache(&config.cache_dir, &cleaner::default_patterns(), &mut report);
    }
    report.finish();

    match cli.format {
        OutputFormat::Human => output::print_report(&report, &output_file),
        OutputFormat::Json => output::print_report_json(&report),
        OutputFormat::Quiet => output::print_report_quiet(&report),
    }

    tracing::info!(
        "Clean-up completed. The output is at {}",
        output_file.display()
    );
    drop(guard);
    Ok(())
}
