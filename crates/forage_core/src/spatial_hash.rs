use forage_data::Vec2;

#[derive(Clone, Debug, Default)]
/// Uniform-grid spatial hash over a snapshot of entity positions.
///
/// Uses the "offset array" pattern (like compressed sparse rows):
/// `cell_offsets[i]..cell_offsets[i+1]` indexes into `entity_indices` for
/// all entities in cell `i`. The index is rebuilt from scratch whenever
/// positions change; it never tracks movement incrementally.
///
/// Positions outside the grid (organisms mid-flight before periodic
/// wrapping) are clamped into the nearest edge cell, so they stay
/// queryable. Non-finite positions are never indexed.
///
/// # Examples
/// ```
/// use forage_core::spatial_hash::SpatialHash;
/// use forage_data::Vec2;
///
/// let positions = vec![Vec2::new(15.0, 15.0), Vec2::new(25.0, 25.0), Vec2::new(85.0, 85.0)];
/// let mut spatial = SpatialHash::new(10.0, 100.0, 100.0);
/// spatial.build(&positions);
///
/// let mut nearby = Vec::new();
/// spatial.query_within_radius(Vec2::new(15.0, 15.0), 15.0, &positions, &mut nearby);
/// assert_eq!(nearby, vec![0, 1]);
/// ```
pub struct SpatialHash {
    pub cell_size: f64,
    pub width: f64,
    pub height: f64,
    pub cols: usize,
    pub rows: usize,
    pub cell_offsets: Vec<usize>,
    pub entity_indices: Vec<usize>,
}

impl SpatialHash {
    /// Creates an empty index over a `width` x `height` domain.
    pub fn new(cell_size: f64, width: f64, height: f64) -> Self {
        let cols = ((width / cell_size).ceil() as usize).max(1);
        let rows = ((height / cell_size).ceil() as usize).max(1);
        Self {
            cell_size,
            width,
            height,
            cols,
            rows,
            cell_offsets: vec![0; cols * rows + 1],
            entity_indices: Vec::new(),
        }
    }

    /// Cell index of an in-bounds coordinate, `None` otherwise.
    #[inline]
    pub fn get_cell_idx(&self, x: f64, y: f64) -> Option<usize> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let cx = (x / self.cell_size).floor() as i64;
        let cy = (y / self.cell_size).floor() as i64;
        if cx < 0 || cx >= self.cols as i64 || cy < 0 || cy >= self.rows as i64 {
            None
        } else {
            Some(cy as usize * self.cols + cx as usize)
        }
    }

    #[inline]
    fn clamp_col(&self, x: f64) -> usize {
        ((x / self.cell_size).floor() as i64).clamp(0, self.cols as i64 - 1) as usize
    }

    #[inline]
    fn clamp_row(&self, y: f64) -> usize {
        ((y / self.cell_size).floor() as i64).clamp(0, self.rows as i64 - 1) as usize
    }

    #[inline]
    fn clamped_cell_idx(&self, p: Vec2) -> Option<usize> {
        if !p.is_finite() {
            return None;
        }
        Some(self.clamp_row(p.y) * self.cols + self.clamp_col(p.x))
    }

    /// Rebuilds the index. Entity `i` is `positions[i]`.
    pub fn build(&mut self, positions: &[Vec2]) {
        let cell_count = self.cols * self.rows;

        let mut counts = vec![0usize; cell_count];
        for &p in positions {
            if let Some(idx) = self.clamped_cell_idx(p) {
                counts[idx] += 1;
            }
        }

        self.cell_offsets.resize(cell_count + 1, 0);
        let mut total = 0;
        for (i, &count) in counts.iter().enumerate() {
            self.cell_offsets[i] = total;
            total += count;
        }
        self.cell_offsets[cell_count] = total;

        self.entity_indices.clear();
        self.entity_indices.resize(total, 0);

        let mut cursor = self.cell_offsets[..cell_count].to_vec();
        for (entity_idx, &p) in positions.iter().enumerate() {
            if let Some(cell_idx) = self.clamped_cell_idx(p) {
                self.entity_indices[cursor[cell_idx]] = entity_idx;
                cursor[cell_idx] += 1;
            }
        }
    }

    /// Number of indexed entities.
    pub fn len(&self) -> usize {
        self.entity_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entity_indices.is_empty()
    }

    /// Collects every entity in the cells overlapping the query square.
    /// Candidates only; callers filter by exact distance.
    #[inline]
    pub fn query_into(&self, x: f64, y: f64, radius: f64, result: &mut Vec<usize>) {
        result.clear();
        if !x.is_finite() || !y.is_finite() || !radius.is_finite() || radius < 0.0 {
            return;
        }
        let min_cx = self.clamp_col(x - radius);
        let max_cx = self.clamp_col(x + radius);
        let min_cy = self.clamp_row(y - radius);
        let max_cy = self.clamp_row(y + radius);

        for cy in min_cy..=max_cy {
            for cx in min_cx..=max_cx {
                let cell_idx = cy * self.cols + cx;
                let start = self.cell_offsets[cell_idx];
                let end = self.cell_offsets[cell_idx + 1];
                result.extend_from_slice(&self.entity_indices[start..end]);
            }
        }
    }

    /// Entities whose position lies within `radius` (inclusive) of `point`,
    /// in ascending index order. Includes the entity sitting at `point`.
    ///
    /// `positions` must be the slice the index was built from.
    pub fn query_within_radius(
        &self,
        point: Vec2,
        radius: f64,
        positions: &[Vec2],
        result: &mut Vec<usize>,
    ) {
        self.query_into(point.x, point.y, radius, result);
        result.retain(|&idx| {
            positions
                .get(idx)
                .is_some_and(|p| p.distance(point) <= radius)
        });
        result.sort_unstable();
    }
}
