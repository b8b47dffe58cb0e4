/// Result of mapping a position through one or more edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapResult {
    pub pos: usize,
    /// The content on the `assoc` side of the position was deleted
    pub deleted: bool,
}

/// Something that can translate positions from one document version to the next
pub trait Mappable {
    /// Map `pos`; `assoc` picks the side (-1 left, 1 right) a position sticks
    /// to when content is inserted or replaced at it
    fn map_result(&self, pos: usize, assoc: i32) -> MapResult;

    fn map(&self, pos: usize) -> usize {
        self.map_result(pos, 1).pos
    }

    fn map_assoc(&self, pos: usize, assoc: i32) -> usize {
        self.map_result(pos, assoc).pos
    }
}

/// A replaced range in old-document coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplacedRange {
    pub start: usize,
    pub old_size: usize,
    pub new_size: usize,
}

/// The position changes caused by a single replace step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepMap {
    ranges: Vec<ReplacedRange>,
}

impl StepMap {
    /// Ranges must be sorted by start and must not overlap
    pub fn new(ranges: Vec<ReplacedRange>) -> Self {
        Self { ranges }
    }

    pub fn replace(start: usize, old_size: usize, new_size: usize) -> Self {
        if old_size == 0 && new_size == 0 {
            return Self::identity();
        }
        Self::new(vec![ReplacedRange {
            start,
            old_size,
            new_size,
        }])
    }

    pub fn identity() -> Self {
        Self::default()
    }

    pub fn ranges(&self) -> &[ReplacedRange] {
        &self.ranges
    }

    /// Call `f(old_start, old_end, new_start, new_end)` for each replaced range
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(usize, usize, usize, usize),
    {
        let mut diff: isize = 0;
        for range in &self.ranges {
            let new_start = offset(range.start, diff);
            f(
                range.start,
                range.start + range.old_size,
                new_start,
                new_start + range.new_size,
            );
            diff += range.new_size as isize - range.old_size as isize;
        }
    }
}

impl Mappable for StepMap {
    fn map_result(&self, pos: usize, assoc: i32) -> MapResult {
        let mut diff: isize = 0;
        for range in &self.ranges {
            let start = range.start;
            if start > pos {
                break;
            }
            let end = start + range.old_size;
            if pos <= end {
                let side = if range.old_size == 0 {
                    assoc
                } else if pos == start {
                    -1
                } else if pos == end {
                    1
                } else {
                    assoc
                };
                let mapped = offset(start, diff) + if side < 0 { 0 } else { range.new_size };
                let deleted = if assoc < 0 { pos != start } else { pos != end };
                return MapResult {
                    pos: mapped,
                    deleted,
                };
            }
            diff += range.new_size as isize - range.old_size as isize;
        }
        MapResult {
            pos: offset(pos, diff),
            deleted: false,
        }
    }
}

fn offset(pos: usize, diff: isize) -> usize {
    pos.saturating_add_signed(diff)
}

/// A pipeline of step maps, applied in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    maps: Vec<StepMap>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_maps(maps: Vec<StepMap>) -> Self {
        Self { maps }
    }

    pub fn maps(&self) -> &[StepMap] {
        &self.maps
    }

    pub fn append_map(&mut self, map: StepMap) {
        self.maps.push(map);
    }

    /// The mapping made of the maps from index `from` onward
    pub fn slice(&self, from: usize) -> Mapping {
        Self {
            maps: self.maps.get(from..).map(<[StepMap]>::to_vec).unwrap_or_default(),
        }
    }
}

impl Mappable for Mapping {
    fn map_result(&self, pos: usize, assoc: i32) -> MapResult {
        self.maps.iter().fold(
            MapResult {
                pos,
                deleted: false,
            },
            |acc, map| {
                let result = map.map_result(acc.pos, assoc);
                MapResult {
                    pos: result.pos,
                    deleted: acc.deleted || result.deleted,
                }
            },
        )
    }
}
