//! Detection of scheduling conflicts within one parsed batch.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc, Weekday};

use crate::models::{Recording, ValidityCode};
use crate::parser::ParsedRow;

/// All seven days, indexing the weekday buckets 0 = Monday .. 6 = Sunday.
const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Find entries that collide with an earlier entry on the same recorder.
///
/// Entries are grouped by resolved recorder id. A recurring group is
/// expanded into weekday buckets (one entry lands in every bucket its
/// cadence covers); each bucket is sorted by start instant and scanned
/// greedily against the last accepted end instant. An individually invalid
/// entry is collected but never advances the scan window, and an overlap is
/// only ever flagged once, at the overlapping entry's own line; no
/// all-pairs enumeration is performed.
///
/// Detected conflicts are recorded in `errors` as `TimeConflict` keyed by
/// line number; the returned list holds every conflicting or invalid entry.
pub fn check_conflicts(
    batch: &[ParsedRow],
    errors: &mut std::collections::BTreeMap<usize, ValidityCode>,
    now: DateTime<Utc>,
) -> Vec<Recording> {
    let mut conflicts = Vec::new();
    let mut flagged: BTreeSet<usize> = BTreeSet::new();

    // Group entry indices by recorder, preserving first-appearance order so
    // the conflict list is stable across runs.
    let mut group_of: HashMap<uuid::Uuid, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (index, row) in batch.iter().enumerate() {
        let slot = *group_of
            .entry(row.recording.recorder_id)
            .or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
        groups[slot].push(index);
    }

    for group in &groups {
        let recurring = group
            .first()
            .map(|&i| batch[i].recording.recurrence.is_some())
            .unwrap_or(false);

        let buckets: Vec<Vec<usize>> = if recurring {
            let mut buckets = vec![Vec::new(); 7];
            for &index in group {
                if let Some(recurrence) = &batch[index].recording.recurrence {
                    for (day_index, day) in WEEK.iter().enumerate() {
                        if recurrence.cadence.contains(*day) {
                            buckets[day_index].push(index);
                        }
                    }
                }
            }
            buckets
        } else {
            vec![group.clone()]
        };

        for mut bucket in buckets {
            bucket.sort_by_key(|&i| batch[i].recording.start);
            let mut last_end: Option<DateTime<Utc>> = None;
            for index in bucket {
                let row = &batch[index];
                if row.recording.check_validity(now) != ValidityCode::Valid {
                    if flagged.insert(row.line) {
                        conflicts.push(row.recording.clone());
                    }
                    continue;
                }
                let (Some(start), Some(end)) = (row.recording.start, row.recording.end()) else {
                    continue;
                };
                if last_end.is_some_and(|last| start < last) {
                    errors.insert(row.line, ValidityCode::TimeConflict);
                    if flagged.insert(row.line) {
                        conflicts.push(row.recording.clone());
                    }
                } else {
                    last_end = Some(end);
                }
            }
        }
    }
    conflicts
}
