use super::mapping::bucket_for_rating;
use super::normalizer::parse_yield;
use super::HoldingsImportError;
use crate::workflows::profiling::Instrument;
use serde::{Deserialize, Deserializer};
use std::io::Read;

pub(crate) fn parse_instruments<R: Read>(
    reader: R,
) -> Result<Vec<Instrument>, HoldingsImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut instruments = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |position| position.line());
        let row: HoldingRow = record.deserialize(Some(&headers))?;
        instruments.push(row.into_instrument(line)?);
    }

    Ok(instruments)
}

#[derive(Debug, Deserialize)]
struct HoldingRow {
    #[serde(rename = "Symbol", alias = "symbol", default)]
    symbol: String,
    #[serde(rename = "Rating", alias = "rating", default)]
    rating: String,
    #[serde(rename = "Yield", alias = "yield", alias = "Current Yield")]
    current_yield: String,
    #[serde(
        rename = "Bucket",
        alias = "bucket",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    bucket: Option<String>,
}

impl HoldingRow {
    fn into_instrument(self, line: u64) -> Result<Instrument, HoldingsImportError> {
        if self.symbol.is_empty() {
            return Err(HoldingsImportError::MissingSymbol { line });
        }

        let current_yield =
            parse_yield(&self.current_yield).ok_or_else(|| HoldingsImportError::InvalidYield {
                symbol: self.symbol.clone(),
                value: self.current_yield.clone(),
            })?;

        // Overrides may name a bucket ("ETF") or a rating ("BBB+"); both resolve
        // through the rating table, unknown labels keep their lowercased text.
        let rating_bucket = bucket_for_rating(self.bucket.as_deref().unwrap_or(&self.rating));

        Ok(Instrument {
            symbol: self.symbol,
            rating_bucket,
            current_yield,
            equivalent_label: self.rating,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
