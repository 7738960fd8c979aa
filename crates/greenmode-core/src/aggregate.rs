//! Grouping of green trial records into section candidates.
//!
//! A bear's green records are first bucketed by the set of setting names they
//! carry. Inside a bucket, records with identical setting values are merged
//! and their file names collected. Order follows first appearance throughout,
//! so the output is deterministic for a deterministic trial order.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{Assignment, SettingValue, FILENAME_KEY};

/// One setting combination and every file it was green on.
///
/// Records of global bears carry no file name; their groups have empty
/// `files`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingGroup {
    pub values: Assignment,
    pub files: Vec<String>,
}

/// All groups sharing the same set of setting names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingBucket {
    pub names: BTreeSet<String>,
    pub groups: Vec<SettingGroup>,
}

/// Bucket and merge the green records of a single bear.
pub fn aggregate(records: &[Assignment]) -> Vec<SettingBucket> {
    let mut buckets: Vec<SettingBucket> = Vec::new();

    for record in records {
        let names: BTreeSet<String> = record.keys().cloned().collect();
        let mut values = record.clone();
        let file = match values.remove(FILENAME_KEY) {
            Some(SettingValue::Str(name)) => Some(name),
            Some(other) => Some(other.to_string()),
            None => None,
        };

        let bucket = match buckets.iter().position(|b| b.names == names) {
            Some(idx) => &mut buckets[idx],
            None => {
                buckets.push(SettingBucket {
                    names,
                    groups: Vec::new(),
                });
                let last = buckets.len() - 1;
                &mut buckets[last]
            }
        };

        match bucket.groups.iter_mut().find(|g| g.values == values) {
            Some(group) => group.files.extend(file),
            None => bucket.groups.push(SettingGroup {
                values,
                files: file.into_iter().collect(),
            }),
        }
    }

    buckets
}
