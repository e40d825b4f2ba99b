//! Unit tests for session configuration validation.

use std::io::Write;

use rstest::rstest;
use tempfile::NamedTempFile;

use super::*;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(&vec![b'k'; len]).expect("write key");
    file
}

fn toggles<'a>(path: &'a Path, same_site: &'a str) -> SessionToggles<'a> {
    SessionToggles {
        key_file: Some(path),
        cookie_secure: true,
        same_site,
        allow_ephemeral: false,
    }
}

fn expect_error(
    result: Result<SessionSettings, SessionConfigError>,
    label: &str,
) -> SessionConfigError {
    match result {
        Ok(_) => panic!("{label}"),
        Err(error) => error,
    }
}

#[rstest]
#[case("strict", SameSite::Strict)]
#[case("Lax", SameSite::Lax)]
#[case(" none ", SameSite::None)]
fn release_accepts_known_policies(#[case] raw: &str, #[case] expected: SameSite) {
    let file = key_file(SESSION_KEY_MIN_LEN);
    let settings =
        session_settings(toggles(file.path(), raw), BuildMode::Release).expect("valid settings");
    assert_eq!(settings.same_site, expected);
    assert!(settings.cookie_secure);
}

#[test]
fn release_rejects_unknown_policy() {
    let file = key_file(SESSION_KEY_MIN_LEN);
    let error = expect_error(
        session_settings(toggles(file.path(), "sometimes"), BuildMode::Release),
        "unknown policy should fail",
    );
    assert!(matches!(error, SessionConfigError::InvalidSameSite { .. }));
}

#[test]
fn debug_falls_back_to_lax() {
    let file = key_file(SESSION_KEY_MIN_LEN);
    let settings = session_settings(toggles(file.path(), "sometimes"), BuildMode::Debug)
        .expect("debug tolerates bad policy");
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
#[case(BuildMode::Release, false)]
#[case(BuildMode::Debug, true)]
fn same_site_none_needs_secure_cookies_in_release(#[case] mode: BuildMode, #[case] ok: bool) {
    let file = key_file(SESSION_KEY_MIN_LEN);
    let mut raw = toggles(file.path(), "none");
    raw.cookie_secure = false;
    let result = session_settings(raw, mode);
    assert_eq!(result.is_ok(), ok);
    if let Err(error) = result {
        assert!(matches!(error, SessionConfigError::InsecureSameSiteNone));
    }
}

#[rstest]
#[case(BuildMode::Release)]
#[case(BuildMode::Debug)]
fn short_keys_are_rejected_in_every_mode(#[case] mode: BuildMode) {
    let file = key_file(SESSION_KEY_MIN_LEN - 1);
    let error = expect_error(
        session_settings(toggles(file.path(), "lax"), mode),
        "short key should fail",
    );
    assert!(matches!(
        error,
        SessionConfigError::KeyTooShort { length, .. } if length == SESSION_KEY_MIN_LEN - 1
    ));
}

#[test]
fn key_is_derived_deterministically_from_the_file() {
    let file = key_file(SESSION_KEY_MIN_LEN);
    let first = session_settings(toggles(file.path(), "lax"), BuildMode::Release).expect("first");
    let second =
        session_settings(toggles(file.path(), "lax"), BuildMode::Release).expect("second");
    assert_eq!(first.key.master(), second.key.master());
}

#[rstest]
#[case(BuildMode::Release, false, false)]
#[case(BuildMode::Release, true, true)]
#[case(BuildMode::Debug, false, true)]
fn missing_key_file_needs_ephemeral_permission(
    #[case] mode: BuildMode,
    #[case] allow_ephemeral: bool,
    #[case] ok: bool,
) {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("absent");
    let mut raw = toggles(&missing, "lax");
    raw.allow_ephemeral = allow_ephemeral;

    let result = session_settings(raw, mode);

    assert_eq!(result.is_ok(), ok);
    if let Err(error) = result {
        assert!(matches!(error, SessionConfigError::KeyRead { .. }));
    }
}
