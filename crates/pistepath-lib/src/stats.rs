use serde::Serialize;

use crate::catalog::{Catalog, Difficulty, Segment};

/// Number of slopes per difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DifficultyCounts {
    pub green: usize,
    pub blue: usize,
    pub red: usize,
    pub black: usize,
    pub unrated: usize,
}

impl DifficultyCounts {
    fn record(&mut self, difficulty: Option<Difficulty>) {
        match difficulty {
            Some(Difficulty::Green) => self.green += 1,
            Some(Difficulty::Blue) => self.blue += 1,
            Some(Difficulty::Red) => self.red += 1,
            Some(Difficulty::Black) => self.black += 1,
            None => self.unrated += 1,
        }
    }

    pub fn get(&self, difficulty: Difficulty) -> usize {
        match difficulty {
            Difficulty::Green => self.green,
            Difficulty::Blue => self.blue,
            Difficulty::Red => self.red,
            Difficulty::Black => self.black,
        }
    }

    pub fn total(&self) -> usize {
        self.green + self.blue + self.red + self.black + self.unrated
    }
}

/// Aggregate figures for an ordered list of segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RouteStats {
    /// Metres climbed on lifts.
    pub vertical_up: f64,
    /// Metres descended on slopes.
    pub vertical_down: f64,
    pub estimated_minutes: f64,
    pub lift_count: usize,
    pub slope_count: usize,
    pub difficulty: DifficultyCounts,
    /// Ids that could not be resolved in the catalog.
    pub skipped: usize,
}

impl RouteStats {
    /// Fold the segments named by `ids`, skipping unknown ids.
    pub fn from_ids<I, S>(catalog: &Catalog, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stats = Self::default();
        for id in ids {
            match catalog.lookup(id.as_ref()) {
                Some(segment) => stats.add(segment),
                None => stats.skipped += 1,
            }
        }
        stats
    }

    /// Fold already resolved segments.
    pub fn from_segments<'a, I>(segments: I) -> Self
    where
        I: IntoIterator<Item = &'a Segment>,
    {
        let mut stats = Self::default();
        for segment in segments {
            stats.add(segment);
        }
        stats
    }

    pub fn add(&mut self, segment: &Segment) {
        self.estimated_minutes += segment.estimated_minutes();
        if segment.is_lift() {
            self.lift_count += 1;
            self.vertical_up += segment.vertical_rise();
        } else {
            self.slope_count += 1;
            self.vertical_down += segment.vertical_drop();
            self.difficulty.record(segment.difficulty());
        }
    }

    pub fn segment_count(&self) -> usize {
        self.lift_count + self.slope_count
    }
}
