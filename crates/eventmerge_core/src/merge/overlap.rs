//! Pairwise overlap predicate.

use crate::model::event::Event;

/// Returns whether two events intersect with positive duration.
///
/// Both comparisons are strict: an event ending exactly when another starts
/// does not overlap it. Symmetric and side-effect free.
pub fn overlaps(a: &Event, b: &Event) -> bool {
    debug_assert!(a.has_valid_span(), "event {} has non-positive span", a.id);
    debug_assert!(b.has_valid_span(), "event {} has non-positive span", b.id);
    a.start_time < b.end_time && b.start_time < a.end_time
}

#[cfg(test)]
mod tests {
    use super::overlaps;
    use crate::model::event::{new_event_id, Event, EventDraft};

    fn event(start: i64, end: i64) -> Event {
        EventDraft::new("e", start, end).into_event(new_event_id(), 0, 0)
    }

    #[test]
    fn overlap_is_symmetric() {
        let cases = [
            (event(0, 10), event(5, 15)),
            (event(0, 10), event(10, 20)),
            (event(0, 100), event(20, 30)),
            (event(50, 60), event(0, 10)),
        ];
        for (a, b) in &cases {
            assert_eq!(overlaps(a, b), overlaps(b, a));
        }
    }

    #[test]
    fn event_overlaps_itself() {
        let a = event(0, 1);
        assert!(overlaps(&a, &a));
    }

    #[test]
    fn touching_endpoints_do_not_overlap() {
        assert!(!overlaps(&event(0, 10), &event(10, 20)));
        assert!(!overlaps(&event(10, 20), &event(0, 10)));
    }

    #[test]
    fn containment_and_partial_intersection_overlap() {
        assert!(overlaps(&event(0, 100), &event(20, 30)));
        assert!(overlaps(&event(0, 10), &event(9, 20)));
    }

    #[test]
    fn disjoint_intervals_do_not_overlap() {
        assert!(!overlaps(&event(0, 10), &event(11, 20)));
    }
}
