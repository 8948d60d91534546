use crate::UniqueNamer;

use chrono::{Local, TimeZone};

/// WHAT: Names follow recording_<YYYYMMDDHHMMSS>.<ext>
/// WHY: The timestamp in the filename is how files sort and are recognised
#[test]
fn given_timestamp_when_generating_name_then_prefixed_stamp_with_extension() {
    // Given: A namer for wav files
    let mut namer = UniqueNamer::new("wav");
    let now = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

    // When: Generating a name
    let name = namer.generate_name(now);

    // Then: Stamp is zero padded
    assert_eq!(name, "recording_20240102030405.wav");
}

/// WHAT: Two names in the same second are different
/// WHY: A second capture must never overwrite the first
#[test]
fn given_same_second_when_generating_twice_then_second_gets_suffix() {
    // Given: A namer and a fixed instant
    let mut namer = UniqueNamer::new("wav");
    let now = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

    // When: Generating three names in that second
    let first = namer.generate_name(now);
    let second = namer.generate_name(now);
    let third = namer.generate_name(now);

    // Then: Each is unique
    assert_eq!(first, "recording_20240102030405.wav");
    assert_eq!(second, "recording_20240102030405_1.wav");
    assert_eq!(third, "recording_20240102030405_2.wav");
}

/// WHAT: The suffix sequence restarts on a new second
/// WHY: Suffixes only disambiguate within one timestamp
#[test]
fn given_new_second_when_generating_then_no_suffix() {
    let mut namer = UniqueNamer::new("wav");
    let now = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let later = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 6).unwrap();

    namer.generate_name(now);
    namer.generate_name(now);
    let name = namer.generate_name(later);

    assert_eq!(name, "recording_20240102030406.wav");
    assert_eq!(namer.extension(), "wav");
}
