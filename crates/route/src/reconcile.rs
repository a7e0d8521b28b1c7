//! Reconciliation of optimizer output against the original stop list.
//!
//! The external order-optimizer returns a list of stop names and is allowed
//! to be lossy: it may drop or rename entries. Reconciliation rebuilds the
//! stop sequence from the returned order and then appends, in original
//! order, every original entry the optimizer lost — no stop is ever
//! silently dropped.

use wanderlist_core::model::ItineraryItem;

/// Rebuilds `original` in the order given by `ordered_names`.
///
/// Names are matched exactly; a name occurring twice consumes matching
/// originals left to right. Unmatched originals are appended at the end in
/// their original order.
pub fn reconcile_order(original: Vec<ItineraryItem>, ordered_names: &[String]) -> Vec<ItineraryItem> {
    let mut slots: Vec<Option<ItineraryItem>> = original.into_iter().map(Some).collect();
    let mut result = Vec::with_capacity(slots.len());

    for name in ordered_names {
        if let Some(slot) = slots
            .iter_mut()
            .find(|s| s.as_ref().is_some_and(|item| item.name == *name))
        {
            result.push(slot.take().unwrap());
        }
    }

    // Whatever the optimizer lost keeps its original relative order.
    let leftovers = slots.into_iter().flatten().collect::<Vec<_>>();
    if !leftovers.is_empty() {
        tracing::debug!(
            count = leftovers.len(),
            "Optimizer dropped stops, appending originals"
        );
    }
    result.extend(leftovers);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stops(names: &[&str]) -> Vec<ItineraryItem> {
        names.iter().map(|n| ItineraryItem::bare(*n)).collect()
    }

    fn names(items: &[ItineraryItem]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_full_reorder() {
        let result = reconcile_order(
            stops(&["A", "B", "C"]),
            &["C".into(), "A".into(), "B".into()],
        );
        assert_eq!(names(&result), ["C", "A", "B"]);
    }

    #[test]
    fn test_dropped_entry_appended_at_end() {
        let result = reconcile_order(stops(&["A", "B", "C"]), &["C".into(), "A".into()]);
        assert_eq!(names(&result), ["C", "A", "B"]);
    }

    #[test]
    fn test_renamed_entry_preserved() {
        // "B" came back misspelled; the unknown name is ignored and the
        // original B survives at the end.
        let result = reconcile_order(
            stops(&["A", "B", "C"]),
            &["C".into(), "Bee".into(), "A".into()],
        );
        assert_eq!(names(&result), ["C", "A", "B"]);
    }

    #[test]
    fn test_multiple_dropped_keep_original_order() {
        let result = reconcile_order(stops(&["A", "B", "C", "D"]), &["C".into()]);
        assert_eq!(names(&result), ["C", "A", "B", "D"]);
    }

    #[test]
    fn test_duplicate_names_consumed_left_to_right() {
        let mut items = stops(&["A", "A", "B"]);
        items[0].description = Some("first".into());
        items[1].description = Some("second".into());

        let result = reconcile_order(items, &["A".into(), "B".into(), "A".into()]);
        assert_eq!(names(&result), ["A", "B", "A"]);
        assert_eq!(result[0].description.as_deref(), Some("first"));
        assert_eq!(result[2].description.as_deref(), Some("second"));
    }

    #[test]
    fn test_empty_optimizer_output_keeps_everything() {
        let result = reconcile_order(stops(&["A", "B"]), &[]);
        assert_eq!(names(&result), ["A", "B"]);
    }
}
