//! Version command

use crate::cli::VersionArgs;
use crate::output;
use crate::version::VersionInfo;
use anyhow::Result;

pub fn run(args: VersionArgs) -> Result<()> {
    let info = VersionInfo::current();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", info.display());
    if let Some(commit) = &info.commit {
        output::kv("Commit", commit);
    }
    if let Some(date) = &info.build_date {
        output::kv("Build date", date);
    }
    if let Some(target) = &info.target {
        output::kv("Target", target);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_version_is_semver() {
        let info = VersionInfo::current();
        assert!(
            semver::Version::parse(&info.version).is_ok(),
            "version should be valid semver, got: {}",
            info.version
        );
    }

    #[test]
    fn test_display_with_all_fields() {
        let info = VersionInfo {
            version: "1.2.3".to_string(),
            commit: Some("abc1234".to_string()),
            build_date: Some("2026-01-01".to_string()),
            target: Some("x86_64-unknown-linux-gnu".to_string()),
        };
        assert_eq!(info.display(), "appdeck 1.2.3 (abc1234) x86_64-unknown-linux-gnu");
        assert_eq!(format!("{}", info), info.display());
    }

    #[test]
    fn test_display_without_optional_fields() {
        let info = VersionInfo {
            version: "0.1.0".to_string(),
            commit: None,
            build_date: None,
            target: None,
        };
        assert_eq!(info.display(), "appdeck 0.1.0");
    }

    #[test]
    fn test_json_round_trip_keeps_version() {
        let info = VersionInfo::current();
        let json = serde_json::to_string(&info).unwrap();
        let back: VersionInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back.version, info.version);
    }
}
