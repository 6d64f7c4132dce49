use crate::components::notion::{properties, PropertyNames};
use crate::components::RecordStore;
use crate::error::SyncResult;
use std::collections::HashSet;
use tracing::debug;

/// Page size used when walking the whole database
pub const INDEX_PAGE_SIZE: u32 = 100;

/// Collect every UID currently stored in the database.
///
/// Follows the continuation cursor until the store stops returning one.
/// Records without a non-empty rich text UID are left out.
pub async fn fetch_existing_uids(
    store: &dyn RecordStore,
    names: &PropertyNames,
) -> SyncResult<HashSet<String>> {
    let mut uids = HashSet::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = store.query(None, INDEX_PAGE_SIZE, cursor.as_deref()).await?;
        pages += 1;

        uids.extend(
            page.results
                .iter()
                .filter_map(|record| properties::rich_text_value(&record.properties, &names.uid)),
        );

        cursor = page.next_cursor;
        if cursor.is_none() {
            break;
        }
    }

    debug!(pages, count = uids.len(), "Built existing UID index");
    Ok(uids)
}
