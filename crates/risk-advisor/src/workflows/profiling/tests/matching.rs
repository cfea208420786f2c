use super::common::*;
use crate::workflows::profiling::allocation::{AllocationUnit, TargetAllocation};
use crate::workflows::profiling::archetypes::{match_archetype, ArchetypeDirectory, DirectoryError};
use crate::workflows::profiling::domain::BucketKey;

#[test]
fn score_inside_lower_band_matches_conservative_a() {
    let directory = conservative_directory();
    let matched = match_archetype(&directory, 0.85).expect("0.85 is covered");
    assert_eq!(matched.name, "Conservative A");
}

#[test]
fn boundary_score_resolves_to_higher_band() {
    let directory = conservative_directory();
    let matched = match_archetype(&directory, 0.9).expect("0.9 is covered");
    assert_eq!(matched.name, "Conservative B");
}

#[test]
fn score_above_every_band_is_unmatched() {
    let directory = three_band_directory();
    assert_eq!(directory.score_range().1, 3.0);
    assert!(match_archetype(&directory, 5.0).is_none());
    assert!(match_archetype(&directory, 3.0).is_none());
}

#[test]
fn score_below_lowest_band_is_unmatched() {
    let directory = three_band_directory();
    assert!(match_archetype(&directory, -0.01).is_none());
    assert!(match_archetype(&directory, f64::NAN).is_none());
}

#[test]
fn every_boundary_neighbourhood_matches_exactly_once() {
    let directory = three_band_directory();
    let boundaries = [0.0, 1.0, 2.0];

    for boundary in boundaries {
        for score in [boundary - 1e-9, boundary, boundary + 1e-9] {
            let hits = directory
                .archetypes()
                .iter()
                .filter(|archetype| archetype.contains(score))
                .count();
            let expected = usize::from(score >= 0.0 && score < 3.0);
            assert_eq!(hits, expected, "score {score} matched {hits} bands");
        }
    }

    let matched = match_archetype(&directory, 2.0).expect("2.0 is covered");
    assert_eq!(matched.id, "high");
}

#[test]
fn directory_sorts_bands_by_min_score() {
    let directory = ArchetypeDirectory::new(vec![
        band("high", "High", 2.0, 3.0),
        band("low", "Low", 0.0, 1.0),
        band("mid", "Mid", 1.0, 2.0),
    ])
    .expect("contiguous once sorted");

    let ids: Vec<&str> = directory
        .archetypes()
        .iter()
        .map(|archetype| archetype.id.as_str())
        .collect();
    assert_eq!(ids, vec!["low", "mid", "high"]);
}

#[test]
fn directory_rejects_gaps() {
    let error = ArchetypeDirectory::new(vec![
        band("low", "Low", 0.0, 1.0),
        band("high", "High", 1.1, 2.0),
    ])
    .expect_err("gap between 1.0 and 1.1");

    assert!(matches!(error, DirectoryError::Gap { .. }));
}

#[test]
fn directory_rejects_overlaps() {
    let error = ArchetypeDirectory::new(vec![
        band("low", "Low", 0.0, 1.2),
        band("high", "High", 1.0, 2.0),
    ])
    .expect_err("bands overlap");

    match error {
        DirectoryError::Overlap {
            lower,
            lower_max,
            upper,
            upper_min,
        } => {
            assert_eq!(lower, "low");
            assert_eq!(lower_max, 1.2);
            assert_eq!(upper, "high");
            assert_eq!(upper_min, 1.0);
        }
        other => panic!("expected overlap, got {other:?}"),
    }
}

#[test]
fn directory_rejects_inverted_and_duplicate_bands() {
    let inverted = ArchetypeDirectory::new(vec![band("flat", "Flat", 1.0, 1.0)])
        .expect_err("empty band");
    assert!(matches!(inverted, DirectoryError::InvalidBand { .. }));

    let duplicate = ArchetypeDirectory::new(vec![
        band("same", "Low", 0.0, 1.0),
        band("same", "High", 1.0, 2.0),
    ])
    .expect_err("duplicate id");
    assert_eq!(duplicate, DirectoryError::DuplicateId("same".to_string()));

    assert_eq!(
        ArchetypeDirectory::new(Vec::new()).expect_err("empty directory"),
        DirectoryError::Empty
    );
}

#[test]
fn directory_rejects_unusable_allocations() {
    let mut archetype = band("low", "Low", 0.0, 1.0);
    archetype.target_allocation =
        TargetAllocation::new(AllocationUnit::Auto, [("other", 100.0)]);
    assert!(matches!(
        ArchetypeDirectory::new(vec![archetype]),
        Err(DirectoryError::InvalidAllocation { .. })
    ));

    let mut archetype = band("low", "Low", 0.0, 1.0);
    archetype.target_allocation =
        TargetAllocation::new(AllocationUnit::Auto, [("bbb", -10.0), ("bb", 110.0)]);
    assert!(matches!(
        ArchetypeDirectory::new(vec![archetype]),
        Err(DirectoryError::InvalidAllocation { .. })
    ));
}

#[test]
fn directory_rejects_allocations_tagged_with_the_wrong_unit() {
    let mut percentages_as_fractions = band("low", "Low", 0.0, 1.0);
    percentages_as_fractions.target_allocation = TargetAllocation::new(
        AllocationUnit::Fraction,
        [(BucketKey::AAA_A, 30.0), (BucketKey::BBB, 70.0)],
    );
    match ArchetypeDirectory::new(vec![percentages_as_fractions]) {
        Err(DirectoryError::InvalidAllocation { id, .. }) => assert_eq!(id, "low"),
        other => panic!("expected invalid allocation, got {other:?}"),
    }

    let mut fractions_as_percentages = band("low", "Low", 0.0, 1.0);
    fractions_as_percentages.target_allocation = TargetAllocation::new(
        AllocationUnit::Percentage,
        [(BucketKey::AAA_A, 0.5), (BucketKey::BBB, 0.5)],
    );
    assert!(matches!(
        ArchetypeDirectory::new(vec![fractions_as_percentages]),
        Err(DirectoryError::InvalidAllocation { .. })
    ));
}

#[test]
fn directory_accepts_allocations_within_rounding_of_full() {
    let mut archetype = band("low", "Low", 0.0, 1.0);
    archetype.target_allocation = TargetAllocation::new(
        AllocationUnit::Percentage,
        [(BucketKey::AAA_A, 33.3), (BucketKey::BBB, 33.3), (BucketKey::BB, 33.3)],
    );
    assert!(ArchetypeDirectory::new(vec![archetype]).is_ok());
}

#[test]
fn standard_directory_covers_the_standard_questionnaire() {
    let directory = ArchetypeDirectory::standard();
    // Standard answers run from 1 to 5 against weights summing to 0.6.
    for score in [0.6, 1.0, 1.5, 2.0, 2.5, 3.0] {
        assert!(
            match_archetype(&directory, score).is_some(),
            "score {score} unmatched"
        );
    }
}
