use init_dev_branch::config::Config;
use init_dev_branch::git::MockRepository;
use init_dev_branch::signoff::{commit_message, SignOff};
use init_dev_branch::version::VersionTag;
use init_dev_branch::workspace::LocalWorkspace;
use init_dev_branch::{BranchInitializer, InitError};
use proptest::prelude::*;
use regex::Regex;
use tempfile::TempDir;

proptest! {
    #[test]
    fn non_matching_names_fail_without_side_effects(raw in "\\PC{0,24}") {
        let pattern = Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+_Dev$").unwrap();
        prop_assume!(!pattern.is_match(&raw));

        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("production")).unwrap();
        let repo = MockRepository::new();
        let workspace = LocalWorkspace::new(dir.path());
        let config = Config::default();

        let err = BranchInitializer::new(&repo, &workspace, &config)
            .initialize(&raw)
            .unwrap_err();

        let is_invalid_format = matches!(err, InitError::InvalidFormat { .. });
        prop_assert!(is_invalid_format);
        prop_assert!(repo.calls().is_empty());
        prop_assert!(dir.path().join("production").is_dir());
    }

    #[test]
    fn near_miss_names_are_rejected(
        major in 0u32..1000,
        minor in 0u32..1000,
        revision in 0u32..1000,
        suffix in prop::sample::select(vec!["_dev", "_DEV", "Dev", "-Dev", "_Dev_", "_Devel", ""]),
    ) {
        let raw = format!("{}.{}.{}{}", major, minor, revision, suffix);
        prop_assert!(VersionTag::parse(&raw).is_err());
    }

    #[test]
    fn version_triple_round_trips_into_commit_message(
        major in 0u64..100_000,
        minor in 0u64..100_000,
        revision in 0u64..100_000,
    ) {
        let raw = format!("{}.{}.{}_Dev", major, minor, revision);
        let version = VersionTag::parse(&raw).unwrap();
        prop_assert_eq!(version, VersionTag::new(major, minor, revision));

        let message = commit_message(&version, &SignOff::from_template(None));
        let expected_subject = format!(
            "Initialize development branch for version {}.{}.{}",
            major, minor, revision
        );
        prop_assert_eq!(message.lines().next(), Some(expected_subject.as_str()));
    }
}
