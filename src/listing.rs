//! Aggregation of the backend's flat document list.

use crate::backend::DocumentRecord;
use std::collections::BTreeMap;

/// Document ids grouped by the file they were ingested from.
///
/// Recomputed from the backend's list on every request; id order within a
/// group follows the backend's order of appearance.
pub type FileListing = BTreeMap<String, Vec<String>>;

/// Group a flat document list by source file name.
///
/// Records are visited in the given order and each `doc_id` is appended to
/// its file's group, so two records sharing a name end up together even when
/// the backend returns them non-contiguously. No id is dropped or duplicated.
pub fn group_documents(records: Vec<DocumentRecord>) -> FileListing {
    let mut listing = FileListing::new();
    for record in records {
        listing
            .entry(record.file_name)
            .or_default()
            .push(record.doc_id);
    }
    listing
}
