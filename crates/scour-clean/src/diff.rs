//! Before/after diffs computed from the pre/post profiles.

use std::collections::BTreeMap;

use scour_model::{DtypeChange, MissingChange, TableProfile};

/// Dtype changes for columns present in both profiles.
pub fn dtype_changes(pre: &TableProfile, post: &TableProfile) -> BTreeMap<String, DtypeChange> {
    let mut out = BTreeMap::new();
    for (name, before) in &pre.dtypes {
        if let Some(after) = post.dtypes.get(name)
            && after != before
        {
            out.insert(
                name.clone(),
                DtypeChange {
                    before: before.clone(),
                    after: after.clone(),
                },
            );
        }
    }
    out
}

/// Missing-fraction changes for columns present in both profiles.
pub fn missing_changes(pre: &TableProfile, post: &TableProfile) -> BTreeMap<String, MissingChange> {
    let mut out = BTreeMap::new();
    for (name, before) in &pre.missingness.per_column {
        if let Some(after) = post.missingness.per_column.get(name)
            && (after - before).abs() > 1e-12
        {
            out.insert(
                name.clone(),
                MissingChange {
                    before: *before,
                    after: *after,
                },
            );
        }
    }
    out
}
