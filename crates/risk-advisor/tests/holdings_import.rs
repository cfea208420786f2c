use risk_advisor::workflows::holdings::{CsvInstrumentSource, HoldingsImporter};
use risk_advisor::workflows::profiling::{BucketKey, InstrumentSource};

fn count_in(instruments: &[risk_advisor::workflows::profiling::Instrument], key: &str) -> usize {
    instruments
        .iter()
        .filter(|instrument| instrument.rating_bucket.as_str() == key)
        .count()
}

#[test]
fn importer_handles_full_sample_export() {
    let data = include_bytes!("../sample_holdings.csv");
    let instruments = HoldingsImporter::from_reader(&data[..]).expect("sample export imports");

    assert_eq!(instruments.len(), 22);
    assert_eq!(count_in(&instruments, BucketKey::AAA_A), 7);
    assert_eq!(count_in(&instruments, BucketKey::BBB), 6);
    assert_eq!(count_in(&instruments, BucketKey::BB), 3);
    assert_eq!(count_in(&instruments, BucketKey::B), 2);
    assert_eq!(count_in(&instruments, BucketKey::ETF), 3);
    assert_eq!(count_in(&instruments, "ccc"), 1);
    assert!(instruments
        .iter()
        .all(|instrument| instrument.current_yield.is_finite()));
}

#[test]
fn moodys_ratings_share_buckets_with_sp_ratings() {
    let csv = "Symbol,Rating,Yield\nORCL-2034,Baa2,5.88\nVZ-2031,BBB+,5.74\nUAL-2030,Ba2,7.35\n";
    let instruments = HoldingsImporter::from_reader(csv.as_bytes()).expect("import succeeds");

    assert_eq!(instruments[0].rating_bucket, instruments[1].rating_bucket);
    assert_eq!(instruments[0].equivalent_label, "Baa2");
    assert_eq!(instruments[2].rating_bucket, BucketKey::new(BucketKey::BB));
}

#[test]
fn csv_source_reads_the_sample_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/sample_holdings.csv");
    let source = CsvInstrumentSource::new(path);

    let universe = source.universe().expect("sample file readable");
    assert_eq!(universe.len(), 22);
    assert_eq!(universe[0].symbol, "UST-2030");
}
