//! Continent segmentation.
//!
//! Continental crust (cells at or above the continental threshold) is split
//! into 4-connected segments. Segments are discovered lazily: the first query
//! that lands on an unlabeled cell flood-fills its whole blob. Segment ids are
//! positions in an arena and stay valid until the next reset; a segment whose
//! crust was handed to another plate is marked empty instead of removed.

use log::debug;

use crate::geometry::{EdgeWrap, Grid};

/// Index of a segment in a plate's segment arena.
pub type ContinentId = usize;

/// Inclusive bounding box of a segment in local plate coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentBounds {
    pub left: usize,
    pub right: usize,
    pub top: usize,
    pub bottom: usize,
}

impl SegmentBounds {
    /// Box covering a single cell.
    pub fn point(x: usize, y: usize) -> Self {
        Self {
            left: x,
            right: x,
            top: y,
            bottom: y,
        }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }

    pub fn enlarge_to_contain(&mut self, x: usize, y: usize) {
        self.left = self.left.min(x);
        self.right = self.right.max(x);
        self.top = self.top.min(y);
        self.bottom = self.bottom.max(y);
    }

    /// Moves the box by a growth offset.
    pub fn shift(&mut self, dx: usize, dy: usize) {
        self.left += dx;
        self.right += dx;
        self.top += dy;
        self.bottom += dy;
    }
}

/// Bookkeeping for one continent of a plate.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinentSegment {
    pub bounds: SegmentBounds,
    /// Number of cells labeled with this segment.
    pub area: usize,
    /// Collisions recorded against this continent in the current step.
    pub coll_count: usize,
}

impl ContinentSegment {
    fn new(bounds: SegmentBounds) -> Self {
        Self {
            bounds,
            area: 0,
            coll_count: 0,
        }
    }

    /// An empty segment has been aggregated away and must be ignored.
    pub fn is_empty(&self) -> bool {
        self.area == 0
    }
}

/// Per-cell continent labels plus the segment arena.
#[derive(Debug, Clone)]
pub struct Segmentation {
    ids: Grid<Option<ContinentId>>,
    segments: Vec<ContinentSegment>,
}

impl Segmentation {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            ids: Grid::new(width, height, None),
            segments: Vec::new(),
        }
    }

    /// Forgets all labels and segments.
    pub fn reset(&mut self) {
        self.ids.fill(None);
        self.segments.clear();
    }

    pub fn segments(&self) -> &[ContinentSegment] {
        &self.segments
    }

    pub fn segment(&self, id: ContinentId) -> Option<&ContinentSegment> {
        self.segments.get(id)
    }

    pub fn segment_mut(&mut self, id: ContinentId) -> Option<&mut ContinentSegment> {
        self.segments.get_mut(id)
    }

    /// Label of the cell at a row-major index.
    pub fn id_at(&self, index: usize) -> Option<ContinentId> {
        self.ids[index]
    }

    pub fn ids(&self) -> &Grid<Option<ContinentId>> {
        &self.ids
    }

    /// Number of segments that still own crust.
    pub fn live_count(&self) -> usize {
        self.segments.iter().filter(|s| !s.is_empty()).count()
    }

    /// Reallocates the label grid to a grown plate and shifts every box.
    pub fn grow(&mut self, width: usize, height: usize, dx: usize, dy: usize) {
        self.ids = self.ids.expanded(width, height, dx, dy, None);
        for segment in &mut self.segments {
            segment.bounds.shift(dx, dy);
        }
    }

    /// Labels a single cell with an existing segment, keeping areas exact.
    pub fn assign(&mut self, x: usize, y: usize, id: ContinentId) {
        let index = self.ids.index_of(x, y);
        let previous = self.ids[index].replace(id);
        if previous == Some(id) {
            return;
        }
        if let Some(segment) = previous.and_then(|p| self.segments.get_mut(p)) {
            segment.area = segment.area.saturating_sub(1);
        }
        if let Some(segment) = self.segments.get_mut(id) {
            segment.area += 1;
            segment.bounds.enlarge_to_contain(x, y);
        }
    }

    /// Returns the segment of local cell `(x, y)`, creating it if needed.
    ///
    /// An unlabeled cell next to an already labeled continental cell joins
    /// that segment (west, east, north, south order, no wrapping). Otherwise
    /// a new segment is flood-filled from the cell. Segments discovered
    /// separately are never merged.
    pub fn resolve(
        &mut self,
        crust: &Grid<f32>,
        x: usize,
        y: usize,
        wrap: EdgeWrap,
        threshold: f32,
    ) -> ContinentId {
        let width = crust.width();
        let height = crust.height();
        let origin = crust.index_of(x, y);

        if let Some(id) = self.ids[origin] {
            return id;
        }

        let neighbours = [
            (x > 0).then(|| origin - 1),
            (x + 1 < width).then(|| origin + 1),
            (y > 0).then(|| origin - width),
            (y + 1 < height).then(|| origin + width),
        ];
        let adjacent = neighbours
            .into_iter()
            .flatten()
            .filter(|&i| crust[i] >= threshold)
            .find_map(|i| self.ids[i]);

        if let Some(id) = adjacent {
            self.ids[origin] = Some(id);
            let segment = &mut self.segments[id];
            segment.area += 1;
            segment.bounds.enlarge_to_contain(x, y);
            return id;
        }

        let id = self.segments.len();
        let segment = FloodFill {
            ids: &mut self.ids,
            crust,
            threshold,
            wrap,
            id,
        }
        .run(x, y);

        debug!(
            "continent {} discovered at ({}, {}): area {}, box {:?}",
            id, x, y, segment.area, segment.bounds
        );
        self.segments.push(segment);
        id
    }
}

/// One span-based flood fill labeling a new segment.
struct FloodFill<'a> {
    ids: &'a mut Grid<Option<ContinentId>>,
    crust: &'a Grid<f32>,
    threshold: f32,
    wrap: EdgeWrap,
    id: ContinentId,
}

impl FloodFill<'_> {
    /// Unlabeled continental cell.
    #[inline]
    fn is_free(&self, index: usize) -> bool {
        self.ids[index].is_none() && self.crust[index] >= self.threshold
    }

    #[inline]
    fn claim(&mut self, index: usize) {
        self.ids[index] = Some(self.id);
    }

    fn run(mut self, x: usize, y: usize) -> ContinentSegment {
        let width = self.crust.width();
        let height = self.crust.height();

        let mut segment = ContinentSegment::new(SegmentBounds::point(x, y));
        let mut todo: Vec<Vec<(usize, usize)>> = vec![Vec::new(); height];
        let mut done: Vec<Vec<(usize, usize)>> = vec![Vec::new(); height];

        let origin = self.crust.index_of(x, y);
        self.claim(origin);
        todo[y].push((x, x));

        loop {
            let mut lines_processed = 0;

            for line in 0..height {
                let Some((mut start, mut end)) = next_span(&mut todo[line], &done[line]) else {
                    continue;
                };

                let here = line * width;

                while start > 0 && self.is_free(here + start - 1) {
                    start -= 1;
                    self.claim(here + start);
                }
                while end < width - 1 && self.is_free(here + end + 1) {
                    end += 1;
                    self.claim(here + end);
                }

                if self.wrap.horizontal && start == 0 && self.is_free(here + width - 1) {
                    self.claim(here + width - 1);
                    todo[line].push((width - 1, width - 1));
                }
                if self.wrap.horizontal && end == width - 1 && self.is_free(here) {
                    self.claim(here);
                    todo[line].push((0, 0));
                }

                segment.area += 1 + end - start;
                segment.bounds.top = segment.bounds.top.min(line);
                segment.bounds.bottom = segment.bounds.bottom.max(line);
                segment.bounds.left = segment.bounds.left.min(start);
                segment.bounds.right = segment.bounds.right.max(end);

                if line > 0 || self.wrap.vertical {
                    let above = if line > 0 { line - 1 } else { height - 1 };
                    self.seed_row(above, start, end, &mut todo[above]);
                }
                if line < height - 1 || self.wrap.vertical {
                    let below = if line < height - 1 { line + 1 } else { 0 };
                    self.seed_row(below, start, end, &mut todo[below]);
                }

                done[line].push((start, end));
                lines_processed += 1;
            }

            if lines_processed == 0 {
                break;
            }
        }

        segment
    }

    /// Claims free runs of `row` touching columns `start..=end` and queues
    /// them as spans.
    fn seed_row(&mut self, row: usize, start: usize, end: usize, queue: &mut Vec<(usize, usize)>) {
        let width = self.crust.width();
        let base = row * width;

        let mut j = start;
        while j <= end {
            if self.is_free(base + j) {
                let first = j;
                self.claim(base + j);
                j += 1;
                while j < width && self.is_free(base + j) {
                    self.claim(base + j);
                    j += 1;
                }
                queue.push((first, j - 1));
            }
            // Column j is either past the row or not free; skip it.
            j += 1;
        }
    }
}

/// Pops the next span of a row that is not already covered by a done span.
fn next_span(todo: &mut Vec<(usize, usize)>, done: &[(usize, usize)]) -> Option<(usize, usize)> {
    while let Some((start, end)) = todo.pop() {
        let mut start = start as isize;
        let mut end = end as isize;
        for &(done_start, done_end) in done {
            let (done_start, done_end) = (done_start as isize, done_end as isize);
            if start >= done_start && start <= done_end {
                start = done_end + 1;
            }
            if end >= done_start && end <= done_end {
                end = done_start - 1;
            }
        }
        if start <= end {
            return Some((start as usize, end as usize));
        }
    }
    None
}
