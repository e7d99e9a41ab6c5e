//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

use crate::config_resolver::PROJECT_CONFIG_NAMES;

const DEFAULT_CONFIG: &str = r#"# styleguide-lint configuration

[analyzer]
# Root directory holding the *.tokens.json dumps (default: current directory)
# root = "./manifests"

# Glob patterns to exclude from analysis
exclude = [
    "**/vendor/**",
]

[styleguide]
profile_module = "profile"
role_module = "role"
role_resource = "system::role"

# Modules and classes a profile may include besides other profiles
profile_include_modules = ["passwords"]
profile_include_classes = ["lvs::realserver"]

deprecated_defines = ["base::service_unit"]

# Resource types a node block may still declare
node_allowed_resources = ["interface::add_ip6_mapped"]

# Domains node regexes must not spell out
disallowed_node_domains = ["wmnet", "wikimedia.org"]

[rules.wmf-styleguide]
enabled = true
# severity = "warning"  # Override default severity
"#;

/// Runs the init command, writing the config into `dir`.
pub fn run(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(PROJECT_CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Edit {} to match your module layout", PROJECT_CONFIG_NAMES[0]);
    println!("  2. Run: styleguide-lint check");

    Ok(())
}
