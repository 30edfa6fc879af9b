use std::error::Error;
use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn latin1_source_is_converted_in_place() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("cafe.txt");
    fs::write(&input, [0x43, 0x61, 0x66, 0xE9])?;

    Command::cargo_bin("textmend")?
        .args([input.to_str().unwrap(), "--in-place"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FIX"))
        .stdout(predicate::str::contains("iso-8859-1"));

    assert_eq!(fs::read(&input)?, vec![0x43, 0x61, 0x66, 0xC3, 0xA9]);
    Ok(())
}

#[test]
fn mojibake_is_repaired_with_forced_utf8_source() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("mojibake.txt");
    fs::write(&input, [0x43, 0x61, 0x66, 0xC3, 0x83, 0xC2, 0xA9])?;

    Command::cargo_bin("textmend")?
        .args([input.to_str().unwrap(), "--in-place", "--from", "utf-8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mojibake-fix"));

    assert_eq!(fs::read(&input)?, vec![0x43, 0x61, 0x66, 0xC3, 0xA9]);
    Ok(())
}

#[test]
fn bom_is_stripped_in_place() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("bom.txt");
    fs::write(&input, [0xEF, 0xBB, 0xBF, 0x48, 0x69])?;

    Command::cargo_bin("textmend")?
        .args([input.to_str().unwrap(), "--in-place", "--from", "utf-8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("strip-bom"));

    assert_eq!(fs::read(&input)?, b"Hi");
    Ok(())
}

#[test]
fn already_clean_utf8_file_is_left_untouched() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("clean.txt");
    fs::write(&input, "Olá\n".as_bytes())?;
    let original = fs::read(&input)?;

    Command::cargo_bin("textmend")?
        .args([input.to_str().unwrap(), "--in-place"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK |"));

    assert_eq!(fs::read(&input)?, original);
    assert!(!dir.path().join("clean.txt.bak").exists());
    Ok(())
}

#[test]
fn incompatible_reverse_conversion_warns_then_auto_fixes() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("price.txt");
    fs::write(&input, "preço €".as_bytes())?;
    let original = fs::read(&input)?;

    Command::cargo_bin("textmend")?
        .args([input.to_str().unwrap(), "--in-place", "--to", "iso-8859-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WARN"))
        .stdout(predicate::str::contains("U+20AC"));
    assert_eq!(fs::read(&input)?, original);

    Command::cargo_bin("textmend")?
        .args([input.to_str().unwrap(), "--in-place", "--to", "iso-8859-1", "--auto-fix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FIX"))
        .stdout(predicate::str::contains("auto-fixed"));

    let fixed = fs::read(&input)?;
    assert_eq!(fixed, "preço EUR".as_bytes());
    Ok(())
}

#[test]
fn binary_file_is_skipped() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("blob.dat");
    let mut bytes = vec![0u8];
    bytes.extend((0..64).map(|i| (i * 53) as u8));
    fs::write(&input, &bytes)?;

    Command::cargo_bin("textmend")?
        .args([input.to_str().unwrap(), "--in-place"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SKIP"))
        .stdout(predicate::str::contains("binary"));

    Ok(())
}

#[test]
fn dry_run_reports_fix_without_writing() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("cafe.txt");
    let original = vec![0x43, 0x61, 0x66, 0xE9];
    fs::write(&input, &original)?;

    Command::cargo_bin("textmend")?
        .args([input.to_str().unwrap(), "--in-place", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FIX"));

    assert_eq!(fs::read(&input)?, original);
    Ok(())
}

#[test]
fn backup_suffix_creates_and_preserves_backup() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("cafe.txt");
    fs::write(&input, [0x43, 0x61, 0x66, 0xE9])?;

    Command::cargo_bin("textmend")?
        .args([input.to_str().unwrap(), "--in-place", "--backup-suffix", ".bak"])
        .assert()
        .success();

    let backup = dir.path().join("cafe.txt.bak");
    assert_eq!(fs::read(&backup)?, vec![0x43, 0x61, 0x66, 0xE9]);
    Ok(())
}

#[test]
fn directory_without_commit_flags_is_an_argument_error() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("a.txt"), "hello")?;

    Command::cargo_bin("textmend")?
        .args([dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .code(2);

    Ok(())
}

#[test]
fn fail_if_not_utf8_does_not_trip_on_a_successfully_converted_file() -> Result<(), Box<dyn Error>> {
    // A forward conversion that fully succeeds leaves no non-UTF-8 content
    // on disk, even though the source encoding was legacy; --fail-if-not-utf8
    // must not treat that as a remaining non-UTF-8 file.
    let dir = tempdir()?;
    let input = dir.path().join("cafe.txt");
    fs::write(&input, [0x43, 0x61, 0x66, 0xE9])?;

    Command::cargo_bin("textmend")?
        .args([input.to_str().unwrap(), "--in-place", "--fail-if-not-utf8"])
        .assert()
        .success();

    Ok(())
}

#[test]
fn fail_if_not_utf8_trips_on_an_undetected_file_in_detect_mode() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("cafe.txt");
    fs::write(&input, [0x43, 0x61, 0x66, 0xE9])?;

    Command::cargo_bin("textmend")?
        .args([input.to_str().unwrap(), "--detect", "--fail-if-not-utf8"])
        .assert()
        .failure()
        .code(1);

    Ok(())
}

#[test]
fn detect_only_mode_never_writes() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("cafe.txt");
    let original = vec![0x43, 0x61, 0x66, 0xE9];
    fs::write(&input, &original)?;

    Command::cargo_bin("textmend")?
        .args([input.to_str().unwrap(), "--detect"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WARN"));

    assert_eq!(fs::read(&input)?, original);
    Ok(())
}
