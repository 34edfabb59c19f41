use chrono::{DateTime, TimeZone, Utc};
use npm_publish::command::{CommandOutput, ScriptedRunner};
use npm_publish::config::ReleaseConfig;
use npm_publish::domain::{BuildType, DistTag};
use npm_publish::environment::{FixedClock, MapEnv};
use npm_publish::registry::Registry;
use npm_publish::scm::MockRepository;
use npm_publish::{NpmPublishError, Resolver};

const COMMIT: &str = "abcdef1234567890abcdef1234567890abcdef12";

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

struct Fixture {
    clock: FixedClock,
    env: MapEnv,
    scm: MockRepository,
    registry: Registry<ScriptedRunner>,
    settings: ReleaseConfig,
}

impl Fixture {
    fn new() -> Self {
        Fixture {
            clock: FixedClock(at(2023, 10, 11, 7, 45)),
            env: MapEnv::new(),
            scm: MockRepository::new().with_head(COMMIT),
            registry: Registry::new(ScriptedRunner::new()),
            settings: ReleaseConfig::default(),
        }
    }

    fn resolver(&self) -> Resolver<'_> {
        Resolver::new(
            &self.clock,
            &self.env,
            &self.scm,
            &self.registry,
            &self.settings,
        )
    }
}

#[test]
fn test_dry_run_uses_short_commit_and_no_tag() {
    let fixture = Fixture::new();
    let info = fixture.resolver().resolve(BuildType::DryRun).unwrap();

    assert_eq!(info.version, "1000.0.0-abcdef123");
    assert_eq!(info.tag, None);
}

#[test]
fn test_dry_run_with_any_commit() {
    for commit in ["0123456789abcdef", "fedcba9876543210ffff"] {
        let mut fixture = Fixture::new();
        fixture.scm = MockRepository::new().with_head(commit);

        let info = fixture.resolver().resolve(BuildType::DryRun).unwrap();
        assert_eq!(info.version, format!("1000.0.0-{}", &commit[..9]));
        assert!(info.tag.is_none());
    }
}

#[test]
fn test_prealpha_uses_utc_hour() {
    let fixture = Fixture::new();
    let info = fixture.resolver().resolve(BuildType::Prealpha).unwrap();

    assert_eq!(info.version, "0.0.0-prealpha-2023101107");
    assert_eq!(info.tag, Some(DistTag::Prealpha));

    let stamp = info.version.trim_start_matches("0.0.0-prealpha-");
    assert!(!stamp.contains(['-', ':', 'T']));
    assert_eq!(stamp.len(), 10);
    let field = |range: std::ops::Range<usize>| stamp[range].parse::<u32>().unwrap();
    let reparsed = at(
        field(0..4) as i32,
        field(4..6),
        field(6..8),
        field(8..10),
        0,
    );
    assert_eq!(reparsed, at(2023, 10, 11, 7, 0));
}

#[test]
fn test_prealpha_does_not_query_source_control() {
    let mut fixture = Fixture::new();
    fixture.scm = MockRepository::new();

    assert!(fixture.resolver().resolve(BuildType::Prealpha).is_ok());
    assert_eq!(fixture.scm.query_count(), 0);
}

#[test]
fn test_nightly_bumps_upstream_minor() {
    let mut fixture = Fixture::new();
    fixture.registry = Registry::new(ScriptedRunner::new().respond(CommandOutput::ok("0.72.4\n")));

    let info = fixture.resolver().resolve(BuildType::Nightly).unwrap();
    assert_eq!(info.version, "0.73.0-nightly-20231011-abcdef123");
    assert_eq!(info.tag, Some(DistTag::Nightly));

    assert_eq!(
        fixture.registry.runner().recorded_args(),
        vec![vec!["view", "react-native@next", "version"]]
    );
}

#[test]
fn test_nightly_rejects_upstream_minor_at_limit() {
    let mut fixture = Fixture::new();
    fixture.registry = Registry::new(
        ScriptedRunner::new().respond(CommandOutput::ok(format!("0.{}.0\n", u64::MAX))),
    );

    let err = fixture.resolver().resolve(BuildType::Nightly).unwrap_err();
    assert!(matches!(err, NpmPublishError::Version(_)));
}

#[test]
fn test_nightly_accepts_release_candidate_upstream() {
    let mut fixture = Fixture::new();
    fixture.registry =
        Registry::new(ScriptedRunner::new().respond(CommandOutput::ok("0.73.0-rc.3\n")));

    let info = fixture.resolver().resolve(BuildType::Nightly).unwrap();
    assert!(info.version.starts_with("0.74.0-nightly-20231011-"));
}

#[test]
fn test_nightly_uses_configured_reference_package() {
    let mut fixture = Fixture::new();
    fixture.settings.reference_package = "@acme/core".to_string();
    fixture.settings.upstream_tag = "latest".to_string();
    fixture.registry = Registry::new(ScriptedRunner::new().respond(CommandOutput::ok("2.9.1")));

    let info = fixture.resolver().resolve(BuildType::Nightly).unwrap();
    assert!(info.version.starts_with("2.10.0-nightly-"));
    assert_eq!(
        fixture.registry.runner().recorded_args()[0][1],
        "@acme/core@latest"
    );
}

#[test]
fn test_nightly_propagates_registry_failure() {
    let mut fixture = Fixture::new();
    fixture.registry = Registry::new(
        ScriptedRunner::new().respond(CommandOutput::failed(1, "npm ERR! network")),
    );

    let err = fixture.resolver().resolve(BuildType::Nightly).unwrap_err();
    assert!(matches!(err, NpmPublishError::Command { .. }));
}

#[test]
fn test_release_prerelease_is_always_next() {
    for latest in [true, false] {
        let mut fixture = Fixture::new();
        fixture.env = MapEnv::new().with("CIRCLE_TAG", "v0.72.0-rc.1");
        if latest {
            fixture.scm = MockRepository::new()
                .with_head(COMMIT)
                .with_latest_tag(COMMIT);
        }

        let info = fixture.resolver().resolve(BuildType::Release).unwrap();
        assert_eq!(info.version, "0.72.0-rc.1");
        assert_eq!(info.tag, Some(DistTag::Next));
    }
}

#[test]
fn test_release_on_older_line_gets_stable_tag() {
    let mut fixture = Fixture::new();
    fixture.env = MapEnv::new().with("CIRCLE_TAG", "0.72.3");

    let info = fixture.resolver().resolve(BuildType::Release).unwrap();
    assert_eq!(info.version, "0.72.3");
    assert_eq!(info.tag.unwrap().to_string(), "0.72-stable");
}

#[test]
fn test_release_tagged_latest() {
    let mut fixture = Fixture::new();
    fixture.env = MapEnv::new().with("CIRCLE_TAG", "0.72.3");
    fixture.scm = MockRepository::new()
        .with_head(COMMIT)
        .with_latest_tag(COMMIT);

    let info = fixture.resolver().resolve(BuildType::Release).unwrap();
    assert_eq!(info.tag, Some(DistTag::Latest));
}

#[test]
fn test_release_without_identifier_is_config_error_without_queries() {
    let fixture = Fixture::new();

    let err = fixture.resolver().resolve(BuildType::Release).unwrap_err();
    assert!(matches!(err, NpmPublishError::Config(_)));
    assert!(err.to_string().contains("CIRCLE_TAG"));
    assert_eq!(fixture.scm.query_count(), 0);
    assert!(fixture.registry.runner().invocations().is_empty());
}

#[test]
fn test_release_blank_identifier_is_config_error() {
    let mut fixture = Fixture::new();
    fixture.env = MapEnv::new().with("CIRCLE_TAG", "  ");

    let err = fixture.resolver().resolve(BuildType::Release).unwrap_err();
    assert!(matches!(err, NpmPublishError::Config(_)));
}

#[test]
fn test_release_reads_configured_variable() {
    let mut fixture = Fixture::new();
    fixture.settings.release_tag_env = "GITHUB_REF_NAME".to_string();
    fixture.env = MapEnv::new()
        .with("CIRCLE_TAG", "0.1.0")
        .with("GITHUB_REF_NAME", "v1.4.2");

    let info = fixture.resolver().resolve(BuildType::Release).unwrap();
    assert_eq!(info.version, "1.4.2");
    assert_eq!(info.tag.unwrap().to_string(), "1.4-stable");
}

#[test]
fn test_release_outside_repository_propagates() {
    let mut fixture = Fixture::new();
    fixture.env = MapEnv::new().with("CIRCLE_TAG", "0.72.3");
    fixture.scm = MockRepository::new();

    let err = fixture.resolver().resolve(BuildType::Release).unwrap_err();
    assert!(matches!(err, NpmPublishError::Git(_)));
}

#[test]
fn test_release_rejects_invalid_identifier() {
    let mut fixture = Fixture::new();
    fixture.env = MapEnv::new().with("CIRCLE_TAG", "release-candidate");

    let err = fixture.resolver().resolve(BuildType::Release).unwrap_err();
    assert!(matches!(err, NpmPublishError::Version(_)));
}

#[test]
fn test_resolve_named_unsupported_build_type() {
    let fixture = Fixture::new();

    let err = fixture.resolver().resolve_named("weekly").unwrap_err();
    assert!(matches!(err, NpmPublishError::UnsupportedBuildType(_)));
}
