//! Line grouping and row ordering.
//!
//! Transforms the loose [`Fragment`]s of one document into ordered table
//! [`Row`]s.
//!
//! ```text
//! Fragment[]  ->  LineClusterer  ->  Row[]
//!  (unordered)     band_for / push     finish (sort by left)
//! ```
//!
//! Vertical offsets of fragments on the same visual line can differ by one
//! unit after extraction rounding, so a fragment at `top` joins the line
//! stored at `top`, `top - 1` or `top + 1`, tried in that order. Adjacent
//! table lines are several units apart and are never merged.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::fragment::Fragment;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// A reconstructed table line.
///
/// Rows are only produced by [`LineClusterer::finish`], so the fragments are
/// always ordered by ascending `left`, ties kept in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    /// The vertical band key the row was created at.
    pub band: i32,
    fragments: Vec<Fragment>,
}

impl Row {
    /// Fragments ordered left to right.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Plain text of the leftmost fragment.
    pub fn leading_text(&self) -> Option<String> {
        self.fragments.first().map(Fragment::plain_text)
    }

    /// Fragment counted from the right: `from_right(1)` is the rightmost.
    pub fn from_right(&self, position: usize) -> Option<&Fragment> {
        if position == 0 {
            return None;
        }
        self.fragments
            .len()
            .checked_sub(position)
            .and_then(|idx| self.fragments.get(idx))
    }

    /// Plain text of every fragment, left to right.
    pub fn texts(&self) -> Vec<String> {
        self.fragments.iter().map(Fragment::plain_text).collect()
    }
}

/// Groups fragments into lines keyed by vertical band.
#[derive(Debug, Default)]
pub struct LineClusterer {
    bands: BTreeMap<i32, Vec<Fragment>>,
}

impl LineClusterer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the band key that a fragment at `top` belongs to, creating a
    /// new band at `top` when no existing band is within one unit.
    ///
    /// Lookup order is `top`, `top - 1`, `top + 1`. When both neighbours
    /// exist the lower one wins.
    pub fn band_for(&mut self, top: i32) -> i32 {
        let candidates = [Some(top), top.checked_sub(1), top.checked_add(1)];
        if let Some(band) = candidates
            .into_iter()
            .flatten()
            .find(|key| self.bands.contains_key(key))
        {
            return band;
        }
        self.bands.insert(top, Vec::new());
        top
    }

    /// Append a fragment to the line it belongs to.
    pub fn push(&mut self, fragment: Fragment) {
        let band = self.band_for(fragment.top);
        self.bands.entry(band).or_default().push(fragment);
    }

    /// Number of lines seen so far.
    pub fn line_count(&self) -> usize {
        self.bands.len()
    }

    /// Freeze membership and order every line left to right.
    ///
    /// Rows come back top to bottom.
    pub fn finish(self) -> Vec<Row> {
        self.bands
            .into_iter()
            .map(|(band, mut fragments)| {
                // `sort_by_key` is stable, equal offsets keep arrival order.
                fragments.sort_by_key(|f| f.left);
                Row { band, fragments }
            })
            .collect()
    }
}

/// Cluster a document's fragments into ordered rows.
pub fn cluster<I>(fragments: I) -> Vec<Row>
where
    I: IntoIterator<Item = Fragment>,
{
    let mut clusterer = LineClusterer::new();
    for fragment in fragments {
        clusterer.push(fragment);
    }
    clusterer.finish()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(top: i32, left: i32, text: &str) -> Fragment {
        Fragment::new(top, left, text)
    }

    // -- band_for ----------------------------------------------------------

    #[test]
    fn band_for_creates_band_when_empty() {
        let mut clusterer = LineClusterer::new();
        assert_eq!(clusterer.band_for(100), 100);
        assert_eq!(clusterer.line_count(), 1);
    }

    #[test]
    fn band_for_prefers_exact_match() {
        let mut clusterer = LineClusterer::new();
        clusterer.band_for(100);
        clusterer.band_for(98);
        clusterer.band_for(102);
        assert_eq!(clusterer.line_count(), 3);
        assert_eq!(clusterer.band_for(100), 100);
        // 99 sits between bands 98 and 100; `top - 1` is tried first.
        assert_eq!(clusterer.band_for(99), 98);
        assert_eq!(clusterer.line_count(), 3);
    }

    #[test]
    fn band_for_prefers_lower_neighbour() {
        let mut clusterer = LineClusterer::new();
        clusterer.band_for(99);
        clusterer.band_for(101);
        assert_eq!(clusterer.band_for(100), 99);
        assert_eq!(clusterer.line_count(), 2);
    }

    #[test]
    fn band_for_uses_upper_neighbour() {
        let mut clusterer = LineClusterer::new();
        clusterer.band_for(101);
        assert_eq!(clusterer.band_for(100), 101);
        assert_eq!(clusterer.line_count(), 1);
    }

    #[test]
    fn band_for_handles_extreme_offsets() {
        let mut clusterer = LineClusterer::new();
        assert_eq!(clusterer.band_for(i32::MAX), i32::MAX);
        assert_eq!(clusterer.band_for(i32::MIN), i32::MIN);
    }

    // -- cluster -----------------------------------------------------------

    #[test]
    fn cluster_empty() {
        assert!(cluster(Vec::new()).is_empty());
    }

    #[test]
    fn cluster_merges_jitter_around_first_fragment() {
        for order in [[100, 99, 101], [100, 101, 99]] {
            let fragments = order
                .iter()
                .enumerate()
                .map(|(i, top)| frag(*top, i as i32 * 10, "x"));
            let rows = cluster(fragments);
            assert_eq!(rows.len(), 1, "order {:?}", order);
            assert_eq!(rows[0].len(), 3);
            assert_eq!(rows[0].band, 100);
        }
    }

    #[test]
    fn cluster_band_is_anchored_at_first_offset() {
        // 101 is two units from band 99 even though 100 joined it.
        let rows = cluster(vec![frag(99, 0, "a"), frag(100, 10, "b"), frag(101, 20, "c")]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].texts(), vec!["a", "b"]);
        assert_eq!(rows[1].texts(), vec!["c"]);
    }

    #[test]
    fn cluster_descending_jitter_splits_off_lowest_offset() {
        let rows = cluster(vec![frag(101, 0, "a"), frag(100, 10, "b"), frag(99, 20, "c")]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].band, 99);
        assert_eq!(rows[0].texts(), vec!["c"]);
        assert_eq!(rows[1].band, 101);
        assert_eq!(rows[1].texts(), vec!["a", "b"]);
    }

    #[test]
    fn cluster_ambiguous_fragment_joins_lower_band() {
        let rows = cluster(vec![frag(99, 0, "a"), frag(101, 0, "b"), frag(100, 10, "c")]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].texts(), vec!["a", "c"]);
        assert_eq!(rows[1].texts(), vec!["b"]);
    }

    #[test]
    fn cluster_merges_neighbours_of_first_fragment() {
        for (first, second) in [(100, 99), (100, 101), (99, 100), (101, 100)] {
            let rows = cluster(vec![frag(first, 0, "a"), frag(second, 10, "b")]);
            assert_eq!(rows.len(), 1, "{} then {}", first, second);
        }
    }

    #[test]
    fn cluster_splits_two_units_apart() {
        let rows = cluster(vec![frag(100, 0, "a"), frag(102, 0, "b")]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].band, 100);
        assert_eq!(rows[1].band, 102);
    }

    #[test]
    fn cluster_starts_new_row_two_units_below_band() {
        let rows = cluster(vec![
            frag(100, 0, "a"),
            frag(99, 10, "b"),
            frag(101, 20, "c"),
            frag(102, 30, "d"),
        ]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].texts(), vec!["a", "b", "c"]);
        assert_eq!(rows[1].texts(), vec!["d"]);
    }

    #[test]
    fn cluster_rows_are_top_to_bottom() {
        let rows = cluster(vec![
            frag(300, 0, "c"),
            frag(100, 0, "a"),
            frag(200, 0, "b"),
        ]);
        let leads: Vec<_> = rows.iter().filter_map(Row::leading_text).collect();
        assert_eq!(leads, vec!["a", "b", "c"]);
    }

    // -- ordering ----------------------------------------------------------

    #[test]
    fn finish_sorts_fragments_by_left() {
        let rows = cluster(vec![
            frag(50, 30, "thirty"),
            frag(50, 10, "ten"),
            frag(50, 20, "twenty"),
        ]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].texts(), vec!["ten", "twenty", "thirty"]);
    }

    #[test]
    fn finish_keeps_arrival_order_for_ties() {
        let rows = cluster(vec![
            frag(50, 10, "first"),
            frag(50, 5, "left"),
            frag(50, 10, "second"),
        ]);
        assert_eq!(rows[0].texts(), vec!["left", "first", "second"]);
    }

    // -- Row accessors -----------------------------------------------------

    #[test]
    fn row_from_right() {
        let rows = cluster(vec![
            frag(0, 0, "a"),
            frag(0, 1, "b"),
            frag(0, 2, "c"),
        ]);
        let row = &rows[0];
        assert_eq!(row.from_right(1).map(|f| f.text.as_str()), Some("c"));
        assert_eq!(row.from_right(3).map(|f| f.text.as_str()), Some("a"));
        assert!(row.from_right(4).is_none());
        assert!(row.from_right(0).is_none());
    }

    #[test]
    fn row_leading_text_is_plain() {
        let rows = cluster(vec![frag(0, 5, "Rep"), frag(0, 0, "<b>Ohio*</b>")]);
        assert_eq!(rows[0].leading_text().as_deref(), Some("Ohio"));
    }
}
