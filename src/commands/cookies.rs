//! Cookie command handlers: dump the browser jar and sync a value file.

use anyhow::{Result, anyhow};
use tracing::info;

use roadie::paths::AppPaths;
use roadie::relay::{self, RelayPlan};

use crate::cli::{DumpArgs, SyncArgs};

pub fn run_cookies_dump_command(args: &DumpArgs) -> Result<()> {
    let paths = resolve_paths(args)?;
    let plan = RelayPlan {
        export_host: args.export_host.clone(),
        export_file: args.export_file.clone(),
        patch_host: args.patch_host.clone(),
        patch_name: args.patch_name.clone(),
        value_file: args.value_file.clone(),
    };

    relay::run_dump(&paths, &plan, args.profile.as_deref())?;

    info!(
        export = %paths.output_dir.join(&plan.export_file).display(),
        config = %paths.config_path.display(),
        value = %paths.output_dir.join(&plan.value_file).display(),
        "Cookie handoff complete"
    );

    Ok(())
}

pub fn run_cookies_sync_command(args: &SyncArgs) -> Result<()> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => {
            AppPaths::from_env()
                .map_err(|error| anyhow!("Cannot resolve the default config path: {error}"))?
                .config_path
        }
    };

    relay::run_sync(&args.value_file, &config_path, &args.key)?;

    info!(config = %config_path.display(), key = %args.key, "Config sync complete");

    Ok(())
}

/// Merge CLI overrides with environment defaults.
///
/// The environment is only consulted when a default is actually needed, so
/// fully-explicit invocations work on machines with no app-data directory.
fn resolve_paths(args: &DumpArgs) -> Result<AppPaths> {
    if let (Some(profile_root), Some(config_path)) = (&args.profile_root, &args.config) {
        return Ok(AppPaths {
            profile_root: profile_root.clone(),
            config_path: config_path.clone(),
            output_dir: args.output_dir.clone(),
        });
    }

    let mut paths =
        AppPaths::from_env().map_err(|error| anyhow!("Cannot resolve default paths: {error}"))?;
    if let Some(profile_root) = &args.profile_root {
        paths.profile_root = profile_root.clone();
    }
    if let Some(config_path) = &args.config {
        paths.config_path = config_path.clone();
    }
    paths.output_dir = args.output_dir.clone();

    Ok(paths)
}
