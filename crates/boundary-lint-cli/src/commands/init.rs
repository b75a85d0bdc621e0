//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "boundary-lint.toml";

const DEFAULT_CONFIG: &str = r#"# boundary-lint configuration

[analyzer]
# Project root, relative to the checked path
root = "."

# Patterns to exclude from analysis
exclude = ["**/node_modules/**", "**/dist/**", "**/generated/**"]

[settings]
# Directory that boundary dirs are relative to
root_dir = "src"

# How imports into another boundary are written:
#   "alias"    -> import { Army } from '@entities'
#   "absolute" -> import { Army } from 'src/domain/entities'
cross_boundary_style = "alias"

# Barrel file basename and resolution extensions (in priority order)
index_file = "index"
extensions = [".ts", ".tsx", ".js", ".jsx"]

# severity = "warning"

# Boundary definitions.
# A boundary may import from itself; everything else must be listed.

[[boundaries]]
dir = "domain/entities"
alias = "@entities"

[[boundaries]]
dir = "domain/events"
alias = "@events"
allow_imports_from = ["@entities"]

[[boundaries]]
dir = "domain/queries"
alias = "@queries"
allow_imports_from = ["@entities"]
allow_type_imports_from = ["@events"]
"#;

/// Runs the init command in the current directory.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("."), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit [[boundaries]] to match your source tree");
    println!("  2. Run: boundary-lint check");

    Ok(())
}

fn write_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))
}
