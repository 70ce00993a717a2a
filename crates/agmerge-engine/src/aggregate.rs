use agmerge_types::{Record, SummaryData};
use serde_json::Value;

/// Sum `summary_data` across summary records.
///
/// Fragments cover disjoint time windows, so plain addition is the right
/// combination; nothing is averaged. An empty input gives all-zero totals.
pub fn aggregate_summaries<'a, I>(summaries: I) -> SummaryData
where
    I: IntoIterator<Item = &'a Record>,
{
    summaries
        .into_iter()
        .map(|summary| {
            SummaryData::from_value(summary.get("summary_data").unwrap_or(&Value::Null))
        })
        .fold(SummaryData::default(), |mut totals, data| {
            totals.accumulate(&data);
            totals
        })
}
