use anyhow::{Context, Result};

use crate::cargo;

const PACKAGE: &str = "lookupsync-common";

/// Tiers of `lookupsync-common`, each checked with default features off.
const TIERS: &[Option<&str>] = &[None, Some("foundation"), Some("observability"), Some("runtime")];

/// Check that every feature tier of the common crate compiles on its own.
pub fn test_feature_matrix() -> Result<()> {
    for (index, &tier) in TIERS.iter().enumerate() {
        let label = tier.unwrap_or("none");
        println!("[{}/{}] {PACKAGE} with features: {label}", index + 1, TIERS.len());

        let mut args = vec!["check", "-p", PACKAGE, "--no-default-features"];
        if let Some(feature) = tier {
            args.extend(["--features", feature]);
        }
        cargo(&args, &format!("tier `{label}` does not compile"))
            .with_context(|| format!("feature tier `{label}`"))?;
    }
    println!("all {} tiers compile", TIERS.len());
    Ok(())
}
