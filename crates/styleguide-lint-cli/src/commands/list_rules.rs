//! List rules command implementation.

use styleguide_lint_core::Config;
use styleguide_lint_rules::{all_rules, NodeRegexFix};

/// Runs the list-rules command.
pub fn run(config: &Config) {
    println!("Available rules:\n");
    println!("{:<10} {:<25} {:<10} Description", "Code", "Name", "Enabled");
    println!("{}", "-".repeat(80));

    for rule in all_rules(&config.styleguide) {
        let enabled = if config.is_rule_enabled(rule.name()) {
            "yes"
        } else {
            "no"
        };
        println!(
            "{:<10} {:<25} {:<10} {}",
            rule.code(),
            rule.name(),
            enabled,
            rule.description()
        );
    }

    let styleguide = &config.styleguide;
    println!("\nConventions:");
    println!("  profile module       {}", styleguide.profile_module);
    println!("  role module          {}", styleguide.role_module);
    println!("  role resource        {}", styleguide.role_resource);
    println!(
        "  disallowed domains   {}",
        styleguide.disallowed_node_domains.join(", ")
    );

    println!("\nFixable with --fix:");
    for fix in NodeRegexFix::ALL {
        println!("  {}", fix.tag());
    }
}
