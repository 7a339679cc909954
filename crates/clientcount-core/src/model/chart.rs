// ── Chart-ready series derived from records ──

use serde::Serialize;

use clientcount_api::ClientCountRecord;

use super::metric::Metric;
use crate::time::{TzOffset, to_local_date_label};

/// One point on the client trend chart. Derived, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// Epoch milliseconds of the record's `createdAt`.
    pub timestamp: i64,
    /// Offset-shifted short date ("Jan 05").
    pub date_label: String,
    pub dhcp: u64,
    pub dynamic: u64,
    pub hotspot: u64,
    pub guest: u64,
}

impl ChartPoint {
    pub fn from_record(record: &ClientCountRecord, offset: TzOffset) -> Self {
        Self {
            timestamp: record.created_at.timestamp_millis(),
            date_label: to_local_date_label(record.created_at, offset),
            dhcp: record.dhcp,
            dynamic: record.dynamic,
            hotspot: record.hotspot,
            guest: record.guest,
        }
    }

    pub fn value(&self, metric: Metric) -> u64 {
        metric.pick([self.dhcp, self.dynamic, self.hotspot, self.guest])
    }
}

/// Count for one metric of a record.
pub fn record_value(record: &ClientCountRecord, metric: Metric) -> u64 {
    metric.pick([record.dhcp, record.dynamic, record.hotspot, record.guest])
}

/// Sort ascending by `createdAt` and map to chart points.
///
/// The sort is stable, so equal timestamps keep their input order and
/// repeated derivation yields the same series.
pub fn chart_data(records: &[ClientCountRecord], offset: TzOffset) -> Vec<ChartPoint> {
    let mut sorted: Vec<&ClientCountRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.created_at);
    sorted
        .into_iter()
        .map(|r| ChartPoint::from_record(r, offset))
        .collect()
}

/// The record with the greatest `createdAt`, if any. Among ties any one
/// may be returned.
pub fn latest(records: &[ClientCountRecord]) -> Option<&ClientCountRecord> {
    records.iter().max_by_key(|r| r.created_at)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    fn rec(id: &str, created_at: &str, dhcp: u64) -> ClientCountRecord {
        ClientCountRecord {
            id: id.into(),
            location: "gatsu".into(),
            session: "pagi".into(),
            dhcp,
            dynamic: 1,
            hotspot: 2,
            guest: 3,
            created_at: created_at.parse().unwrap(),
        }
    }

    #[test]
    fn chart_is_sorted_by_created_at() {
        let records = vec![
            rec("c", "2024-01-03T00:00:00Z", 3),
            rec("a", "2024-01-01T00:00:00Z", 1),
            rec("b", "2024-01-02T00:00:00Z", 2),
        ];
        let points = chart_data(&records, TzOffset::WIB);
        let dhcp: Vec<u64> = points.iter().map(|p| p.dhcp).collect();
        assert_eq!(dhcp, vec![1, 2, 3]);
        assert!(points.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(points, chart_data(&records, TzOffset::WIB));
    }

    #[test]
    fn chart_labels_use_offset() {
        let records = vec![rec("a", "2024-01-04T18:30:00Z", 1)];
        let points = chart_data(&records, TzOffset::WIB);
        assert_eq!(points[0].date_label, "Jan 05");
        assert_eq!(points[0].timestamp, 1_704_393_000_000);
    }

    #[test]
    fn latest_picks_max_created_at() {
        let records = vec![
            rec("t1", "2024-01-01T00:00:00Z", 1),
            rec("t2", "2024-01-03T00:00:00Z", 2),
            rec("t3", "2024-01-02T00:00:00Z", 3),
        ];
        assert_eq!(latest(&records).unwrap().id, "t2");
    }

    #[test]
    fn point_and_record_agree_per_metric() {
        let record = rec("a", "2024-01-01T00:00:00Z", 9);
        let point = ChartPoint::from_record(&record, TzOffset::WIB);
        let counts: Vec<(u64, u64)> = Metric::iter()
            .map(|m| (point.value(m), record_value(&record, m)))
            .collect();
        assert_eq!(counts, vec![(9, 9), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn latest_of_empty_is_none() {
        assert!(latest(&[]).is_none());
        assert!(chart_data(&[], TzOffset::WIB).is_empty());
    }
}
