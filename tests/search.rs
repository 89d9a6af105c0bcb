//! End-to-end search runs against InfoZip fixtures.

mod common;

use common::{fixture, CountingProgress};
use zipbrute::search::{
    Config, ConfigError, Filter, FullCheck, NegativeCache, NoProgress, Search, SearchError,
    CACHE_FILE,
};
use zipbrute::ZipError;

fn config(archive: &str, db: &tempfile::TempDir) -> Config {
    Config::new(fixture(archive)).with_db_path(db.path())
}

#[test]
fn finds_two_character_password() {
    let db = tempfile::tempdir().unwrap();
    let search = Search::open(config("ab_two_members.zip", &db).with_length(2).with_workers(2)).unwrap();
    assert_eq!(search.cached(), 0);
    assert_eq!(search.total(), 1296);

    let progress = CountingProgress::default();
    let report = search.run(&progress).unwrap();
    assert_eq!(report.password.as_deref(), Some("AB"));
    assert!(report.probe_passed >= 1);
    assert!(progress.is_finished());
    assert_eq!(progress.count(), report.processed);
}

#[test]
fn exhausts_space_without_match() {
    let db = tempfile::tempdir().unwrap();
    let search = Search::open(config("ab_two_members.zip", &db).with_workers(2)).unwrap();
    let report = search.run(&NoProgress).unwrap();

    assert_eq!(report.password, None);
    assert_eq!(report.total, 36);
    assert_eq!(report.processed, 36);
    assert_eq!(report.filtered, 10);
    assert_eq!(report.cached, 0);
    assert_eq!(report.verified, 26);
    assert_eq!(report.probe_passed, 0);
    assert_eq!(search.cache().len().unwrap(), 26);
}

#[test]
fn second_run_skips_cached_candidates() {
    let db = tempfile::tempdir().unwrap();
    let first = Search::open(config("ab_two_members.zip", &db).with_workers(2)).unwrap();
    assert_eq!(first.run(&NoProgress).unwrap().verified, 26);
    drop(first);

    let second = Search::open(config("ab_two_members.zip", &db).with_workers(2)).unwrap();
    assert_eq!(second.cached(), 26);
    let report = second.run(&NoProgress).unwrap();
    assert_eq!(report.password, None);
    assert_eq!(report.processed, 36);
    assert_eq!(report.cached, 26);
    assert_eq!(report.verified, 0);
    assert_eq!(second.cache().len().unwrap(), 26);
}

#[test]
fn digit_leading_password_is_never_tried() {
    let db = tempfile::tempdir().unwrap();
    let search = Search::open(config("digit_leading_1a.zip", &db).with_length(2).with_workers(4)).unwrap();
    let report = search.run(&NoProgress).unwrap();

    assert_eq!(report.password, None);
    assert_eq!(report.processed, 1296);
    assert_eq!(report.filtered, 360);
    assert_eq!(report.verified, 936);
    assert!(!search.cache().contains("1A").unwrap());
}

#[test]
fn digit_leading_password_found_without_filter() {
    let db = tempfile::tempdir().unwrap();
    let search = Search::open(config("digit_leading_1a.zip", &db).with_length(2).with_workers(2))
        .unwrap()
        .with_filter(Filter::none());
    let report = search.run(&NoProgress).unwrap();
    assert_eq!(report.password.as_deref(), Some("1A"));
    assert_eq!(report.filtered, 0);
}

#[test]
fn success_cancels_remaining_work() {
    let db = tempfile::tempdir().unwrap();
    let search = Search::open(config("aa_two_members.zip", &db).with_length(2).with_workers(8)).unwrap();
    let report = search.run(&NoProgress).unwrap();

    assert_eq!(report.password.as_deref(), Some("AA"));
    assert!(report.processed < 1296);
    let cached = search.cache().len().unwrap();
    assert!(cached < 1296);
    assert!(!search.cache().contains("AA").unwrap());
    drop(search);

    // Cancellation does not lose the cache: a rerun finds the password again.
    let rerun = Search::open(config("aa_two_members.zip", &db).with_length(2).with_workers(8)).unwrap();
    assert_eq!(rerun.cached(), cached);
    assert_eq!(rerun.run(&NoProgress).unwrap().password.as_deref(), Some("AA"));
}

#[test]
fn missing_archive_is_fatal_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("cache");
    let config = Config::new(dir.path().join("missing.zip")).with_db_path(&db);

    let err = Search::open(config).unwrap_err();
    assert!(matches!(
        err,
        SearchError::Archive {
            source: ZipError::Io(_),
            ..
        }
    ));
    assert!(!err.is_config());
    assert!(!db.exists());
}

#[test]
fn full_check_rejects_probe_false_positive() {
    // one.txt is encrypted with AB, two.txt with AC.
    let db = tempfile::tempdir().unwrap();
    let search = Search::open(config("mixed_ab_ac.zip", &db).with_length(2).with_workers(2)).unwrap();
    let report = search.run(&NoProgress).unwrap();

    assert_eq!(report.password, None);
    assert_eq!(report.probe_passed, 1);
    assert!(search.cache().contains("AB").unwrap());
}

#[test]
fn single_member_archive_with_probe_only() {
    let db = tempfile::tempdir().unwrap();
    let search = Search::open(
        config("ab_single_member.zip", &db)
            .with_length(2)
            .with_workers(2)
            .with_full_check(FullCheck::MultiMemberOnly),
    )
    .unwrap();
    assert_eq!(search.run(&NoProgress).unwrap().password.as_deref(), Some("AB"));
}

#[test]
fn unencrypted_archive_is_rejected() {
    let db = tempfile::tempdir().unwrap();
    assert!(matches!(
        Search::open(config("plain.zip", &db)),
        Err(SearchError::NotEncrypted(_))
    ));
    assert!(!db.path().join(CACHE_FILE).exists());
}

#[test]
fn invalid_config_is_reported_before_work() {
    let db = tempfile::tempdir().unwrap();
    let err = Search::open(config("ab_two_members.zip", &db).with_length(0)).unwrap_err();
    assert!(err.is_config());
    assert!(matches!(err, SearchError::Config(ConfigError::InvalidLength(0))));

    let err = Search::open(Config::new("").with_db_path(db.path())).unwrap_err();
    assert!(matches!(err, SearchError::Config(ConfigError::EmptyInput)));
    assert_eq!(err.to_string(), "input file is empty");
}

#[test]
fn small_queue_still_covers_every_candidate() {
    let db = tempfile::tempdir().unwrap();
    let search = Search::open(
        config("ab_two_members.zip", &db)
            .with_workers(3)
            .with_queue_capacity(1),
    )
    .unwrap();
    let report = search.run(&NoProgress).unwrap();
    assert_eq!(report.processed, 36);
    assert_eq!(report.verified + report.filtered, 36);
}

#[test]
fn cache_opened_by_search_is_shared_with_direct_access() {
    let db = tempfile::tempdir().unwrap();
    {
        let cache = NegativeCache::open(db.path()).unwrap();
        cache.insert("A").unwrap();
        cache.insert("B").unwrap();
    }
    let search = Search::open(config("ab_two_members.zip", &db).with_workers(1)).unwrap();
    assert_eq!(search.cached(), 2);
    let report = search.run(&NoProgress).unwrap();
    assert_eq!(report.cached, 2);
    assert_eq!(report.verified, 24);
}
