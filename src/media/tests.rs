use super::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

const DESCRIPTOR: &str = "album.json";

fn mount(root: &Path, rel: &str, with_descriptor: bool) -> PathBuf {
    let dir = root.join(rel);
    fs::create_dir_all(&dir).unwrap();
    if with_descriptor {
        fs::write(dir.join(DESCRIPTOR), "{}").unwrap();
    }
    dir
}

fn pattern(root: &Path, rest: &str) -> String {
    format!("{}/{}", root.display(), rest)
}

fn watcher(patterns: Vec<String>) -> MediaWatcher {
    MediaWatcher::new(patterns, DESCRIPTOR, Duration::from_millis(500))
}

fn root() -> TempDir {
    tempfile::tempdir().unwrap()
}

#[test]
fn expand_lists_matches_in_lexical_order() {
    let tmp = root();
    mount(tmp.path(), "media/pi/ZETA", false);
    mount(tmp.path(), "media/pi/ALPHA", false);
    mount(tmp.path(), "media/pi/MIDDLE", false);

    let found = expand(&pattern(tmp.path(), "media/pi/*"));
    let names: Vec<_> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["ALPHA", "MIDDLE", "ZETA"]);
}

#[test]
fn expand_handles_wildcards_in_inner_components() {
    let tmp = root();
    mount(tmp.path(), "media/bob/USB1", false);
    mount(tmp.path(), "media/alice/USB2", false);
    fs::write(tmp.path().join("media/not-a-dir"), "").unwrap();

    let found = expand(&pattern(tmp.path(), "media/*/USB?"));
    assert_eq!(
        found,
        vec![
            tmp.path().join("media/alice/USB2"),
            tmp.path().join("media/bob/USB1"),
        ]
    );
}

#[test]
fn wildcards_skip_hidden_entries() {
    let tmp = root();
    mount(tmp.path(), "mnt/.Trash", false);
    mount(tmp.path(), "mnt/usb", false);

    assert_eq!(expand(&pattern(tmp.path(), "mnt/*")), vec![tmp.path().join("mnt/usb")]);
    assert_eq!(
        expand(&pattern(tmp.path(), "mnt/.*")),
        vec![tmp.path().join("mnt/.Trash")]
    );
}

#[test]
fn expand_of_missing_root_is_empty() {
    let tmp = root();
    assert!(expand(&pattern(tmp.path(), "nowhere/*")).is_empty());
}

#[test]
fn first_pattern_wins_over_lexical_order() {
    let tmp = root();
    mount(tmp.path(), "media/pi/AAA", true);
    let preferred = mount(tmp.path(), "mnt/zzz", true);

    let w = watcher(vec![
        pattern(tmp.path(), "mnt/*"),
        pattern(tmp.path(), "media/pi/*"),
    ]);
    assert_eq!(w.find_descriptor(), Some(preferred.join(DESCRIPTOR)));
}

#[test]
fn mounts_without_descriptor_are_skipped() {
    let tmp = root();
    mount(tmp.path(), "media/pi/AAA", false);
    let cart = mount(tmp.path(), "media/pi/BBB", true);

    let w = watcher(vec![pattern(tmp.path(), "media/pi/*")]);
    assert_eq!(w.find_descriptor(), Some(cart.join(DESCRIPTOR)));
}

#[test]
fn poll_respects_the_cadence() {
    let tmp = root();
    let mut w = watcher(vec![pattern(tmp.path(), "media/pi/*")]);
    let t0 = Instant::now();

    assert_eq!(w.poll(t0), None);
    let cart = mount(tmp.path(), "media/pi/CART", true);

    // Inserted between scans: not seen until the interval elapses.
    assert_eq!(w.poll(t0 + Duration::from_millis(100)), None);
    assert_eq!(
        w.poll(t0 + Duration::from_millis(500)),
        Some(cart.join(DESCRIPTOR))
    );
}

#[test]
fn reset_makes_the_next_poll_immediate() {
    let tmp = root();
    let mut w = watcher(vec![pattern(tmp.path(), "media/pi/*")]);
    let t0 = Instant::now();

    assert_eq!(w.poll(t0), None);
    let cart = mount(tmp.path(), "media/pi/CART", true);
    w.reset();
    assert_eq!(w.poll(t0), Some(cart.join(DESCRIPTOR)));
}

#[test]
fn ignored_descriptors_are_skipped_until_removed() {
    let tmp = root();
    let bad = mount(tmp.path(), "media/pi/AAA", true).join(DESCRIPTOR);
    let good = mount(tmp.path(), "media/pi/BBB", true).join(DESCRIPTOR);

    let mut w = watcher(vec![pattern(tmp.path(), "media/pi/*")]);
    w.ignore(bad.clone());
    assert_eq!(w.poll(Instant::now()), Some(good.clone()));

    fs::remove_file(&bad).unwrap();
    w.reset();
    assert_eq!(w.poll(Instant::now()), Some(good));

    fs::write(&bad, "{}").unwrap();
    w.reset();
    assert_eq!(w.poll(Instant::now()), Some(bad));
}
