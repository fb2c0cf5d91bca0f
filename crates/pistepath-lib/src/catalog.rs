use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::spatial::EndpointIndex;

/// Identifier for a lift or slope, namespaced by kind (`lift-*` / `piste-*`).
pub type SegmentId = String;

/// Jaro-Winkler similarity below which fuzzy suggestions are discarded.
const FUZZY_MATCH_THRESHOLD: f64 = 0.8;

/// Slope difficulty ladder. Ordering follows the ladder: green < blue < red < black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Green,
    Blue,
    Red,
    Black,
}

/// Cruising speed assumed for slopes without a recognised difficulty.
pub const UNRATED_SPEED_KMH: f64 = 30.0;

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Green,
        Difficulty::Blue,
        Difficulty::Red,
        Difficulty::Black,
    ];

    /// Average skiing speed on a slope of this difficulty, in km/h.
    pub fn speed_kmh(self) -> f64 {
        match self {
            Difficulty::Green => 25.0,
            Difficulty::Blue => 30.0,
            Difficulty::Red => 35.0,
            Difficulty::Black => 40.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Green => "green",
            Difficulty::Blue => "blue",
            Difficulty::Red => "red",
            Difficulty::Black => "black",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "green" | "novice" | "easy" => Ok(Difficulty::Green),
            "blue" | "intermediate" => Ok(Difficulty::Blue),
            "red" | "advanced" => Ok(Difficulty::Red),
            "black" | "expert" => Ok(Difficulty::Black),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

/// Coarse segment classification used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentCategory {
    Lift,
    Slope,
}

impl SegmentCategory {
    pub fn label(self) -> &'static str {
        match self {
            SegmentCategory::Lift => "lift",
            SegmentCategory::Slope => "slope",
        }
    }
}

impl fmt::Display for SegmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Kind-specific attributes, resolved once when the catalog is decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentKind {
    Lift {
        lift_type: Option<String>,
        vertical_rise: f64,
        duration_minutes: f64,
    },
    Slope {
        /// `None` when the source difficulty was missing or unrecognised.
        difficulty: Option<Difficulty>,
        vertical_drop: f64,
        length_meters: f64,
    },
}

/// A lift ride or a skiable slope edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub id: SegmentId,
    pub name: String,
    pub kind: SegmentKind,
    pub geometry: Vec<Coordinate>,
    /// Precomputed exit connections; `None` when the input carried none.
    pub connects_to: Option<BTreeSet<SegmentId>>,
    pub bidirectional: bool,
}

impl Segment {
    pub fn category(&self) -> SegmentCategory {
        match self.kind {
            SegmentKind::Lift { .. } => SegmentCategory::Lift,
            SegmentKind::Slope { .. } => SegmentCategory::Slope,
        }
    }

    pub fn is_lift(&self) -> bool {
        matches!(self.kind, SegmentKind::Lift { .. })
    }

    /// Slope difficulty. Lifts and unrated slopes return `None`.
    pub fn difficulty(&self) -> Option<Difficulty> {
        match self.kind {
            SegmentKind::Slope { difficulty, .. } => difficulty,
            SegmentKind::Lift { .. } => None,
        }
    }

    /// Whether the segment may be used under an optional difficulty ceiling.
    ///
    /// Lifts always pass. Unrated slopes only pass when no ceiling is set.
    pub fn within_difficulty(&self, ceiling: Option<Difficulty>) -> bool {
        let Some(ceiling) = ceiling else {
            return true;
        };
        match self.kind {
            SegmentKind::Lift { .. } => true,
            SegmentKind::Slope { difficulty, .. } => {
                difficulty.is_some_and(|difficulty| difficulty <= ceiling)
            }
        }
    }

    /// First vertex of the geometry.
    pub fn entry(&self) -> Coordinate {
        self.geometry[0]
    }

    /// Last vertex of the geometry.
    pub fn exit(&self) -> Coordinate {
        self.geometry[self.geometry.len() - 1]
    }

    /// Points where the segment can be entered (both ends when bidirectional).
    pub fn entry_points(&self) -> Vec<Coordinate> {
        if self.bidirectional {
            vec![self.entry(), self.exit()]
        } else {
            vec![self.entry()]
        }
    }

    /// Points where the segment can be left (both ends when bidirectional).
    pub fn exit_points(&self) -> Vec<Coordinate> {
        if self.bidirectional {
            vec![self.exit(), self.entry()]
        } else {
            vec![self.exit()]
        }
    }

    /// Estimated traversal time in minutes.
    pub fn estimated_minutes(&self) -> f64 {
        match self.kind {
            SegmentKind::Lift {
                duration_minutes, ..
            } => duration_minutes,
            SegmentKind::Slope {
                difficulty,
                length_meters,
                ..
            } => {
                let speed = difficulty.map_or(UNRATED_SPEED_KMH, Difficulty::speed_kmh);
                length_meters / 1000.0 / speed * 60.0
            }
        }
    }

    pub fn vertical_rise(&self) -> f64 {
        match self.kind {
            SegmentKind::Lift { vertical_rise, .. } => vertical_rise,
            SegmentKind::Slope { .. } => 0.0,
        }
    }

    pub fn vertical_drop(&self) -> f64 {
        match self.kind {
            SegmentKind::Slope { vertical_drop, .. } => vertical_drop,
            SegmentKind::Lift { .. } => 0.0,
        }
    }
}

// =============================================================================
// Input records
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LiftRecord {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    lift_type: Option<String>,
    #[serde(default)]
    vertical_rise: f64,
    #[serde(alias = "durationMinutes")]
    duration: f64,
    coordinates: Vec<Vec<f64>>,
    #[serde(default)]
    connects_to: Option<Vec<String>>,
    #[serde(default)]
    bidirectional: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlopeRecord {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    vertical_drop: f64,
    #[serde(alias = "lengthMeters")]
    length: f64,
    coordinates: Vec<Vec<f64>>,
    #[serde(default)]
    connects_to: Option<Vec<String>>,
    #[serde(default)]
    bidirectional: bool,
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    lifts: Vec<LiftRecord>,
    #[serde(default, alias = "pistes")]
    slopes: Vec<SlopeRecord>,
}

impl LiftRecord {
    fn into_segment(self) -> Result<Segment> {
        check_non_negative(&self.id, "verticalRise", self.vertical_rise)?;
        check_non_negative(&self.id, "duration", self.duration)?;
        let geometry = decode_geometry(&self.id, &self.coordinates)?;
        Ok(Segment {
            kind: SegmentKind::Lift {
                lift_type: self.lift_type,
                vertical_rise: self.vertical_rise,
                duration_minutes: self.duration,
            },
            geometry,
            connects_to: self.connects_to.map(|ids| ids.into_iter().collect()),
            bidirectional: self.bidirectional,
            name: self.name,
            id: self.id,
        })
    }
}

impl SlopeRecord {
    fn into_segment(self) -> Result<Segment> {
        check_non_negative(&self.id, "verticalDrop", self.vertical_drop)?;
        check_non_negative(&self.id, "length", self.length)?;
        let geometry = decode_geometry(&self.id, &self.coordinates)?;
        let difficulty = match self.difficulty.as_deref() {
            None => None,
            Some(raw) => match raw.parse::<Difficulty>() {
                Ok(difficulty) => Some(difficulty),
                Err(_) => {
                    warn!(segment = %self.id, difficulty = raw, "unrecognised difficulty; treating slope as unrated");
                    None
                }
            },
        };
        Ok(Segment {
            kind: SegmentKind::Slope {
                difficulty,
                vertical_drop: self.vertical_drop,
                length_meters: self.length,
            },
            geometry,
            connects_to: self.connects_to.map(|ids| ids.into_iter().collect()),
            bidirectional: self.bidirectional,
            name: self.name,
            id: self.id,
        })
    }
}

fn check_non_negative(id: &str, field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::CatalogValidation {
            message: format!("segment {id} has invalid {field} {value}"),
        })
    }
}

fn decode_geometry(id: &str, raw: &[Vec<f64>]) -> Result<Vec<Coordinate>> {
    if raw.is_empty() {
        return Err(Error::CatalogValidation {
            message: format!("segment {id} has no coordinates"),
        });
    }
    raw.iter()
        .map(|point| match point.as_slice() {
            [longitude, latitude] => Ok(Coordinate::new(*longitude, *latitude)),
            [longitude, latitude, elevation, ..] => Ok(Coordinate {
                longitude: *longitude,
                latitude: *latitude,
                elevation: Some(*elevation),
            }),
            _ => Err(Error::CatalogValidation {
                message: format!("segment {id} has a coordinate with fewer than two values"),
            }),
        })
        .collect()
}

// =============================================================================
// Catalog
// =============================================================================

/// Immutable index of every lift and slope in the resort.
///
/// Segments are stored sorted by id so iteration order, and therefore search
/// tie-breaking, is stable across loads.
#[derive(Debug)]
pub struct Catalog {
    segments: Vec<Segment>,
    by_id: HashMap<SegmentId, usize>,
    endpoints: EndpointIndex,
}

impl Catalog {
    /// Build a catalog from already decoded segments.
    pub fn from_segments(mut segments: Vec<Segment>) -> Result<Self> {
        segments.sort_by(|a, b| a.id.cmp(&b.id));

        let mut by_id = HashMap::with_capacity(segments.len());
        for (index, segment) in segments.iter().enumerate() {
            if segment.geometry.is_empty() {
                return Err(Error::CatalogValidation {
                    message: format!("segment {} has no coordinates", segment.id),
                });
            }
            if by_id.insert(segment.id.clone(), index).is_some() {
                return Err(Error::CatalogValidation {
                    message: format!("duplicate segment id {}", segment.id),
                });
            }
        }

        let known: HashSet<&str> = segments.iter().map(|s| s.id.as_str()).collect();
        for segment in &segments {
            let Some(targets) = &segment.connects_to else {
                continue;
            };
            for target in targets.iter().filter(|t| !known.contains(t.as_str())) {
                warn!(segment = %segment.id, target = %target, "connectsTo references an unknown segment");
            }
        }

        let endpoints = EndpointIndex::build(&segments);

        info!(
            lifts = segments.iter().filter(|s| s.is_lift()).count(),
            slopes = segments.iter().filter(|s| !s.is_lift()).count(),
            endpoints = endpoints.len(),
            "built segment catalog"
        );

        Ok(Self {
            segments,
            by_id,
            endpoints,
        })
    }

    /// Decode a catalog from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_reader(reader)?;
        Self::from_document(document)
    }

    /// Decode a catalog from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    fn from_document(document: CatalogDocument) -> Result<Self> {
        debug!(
            lifts = document.lifts.len(),
            slopes = document.slopes.len(),
            "decoding catalog records"
        );
        let mut segments = Vec::with_capacity(document.lifts.len() + document.slopes.len());
        for lift in document.lifts {
            segments.push(lift.into_segment()?);
        }
        for slope in document.slopes {
            segments.push(slope.into_segment()?);
        }
        Self::from_segments(segments)
    }

    /// Lookup a segment, failing with suggestions when the id is unknown.
    pub fn get(&self, id: &str) -> Result<&Segment> {
        self.lookup(id).ok_or_else(|| Error::SegmentNotFound {
            id: id.to_string(),
            suggestions: self.fuzzy_segment_matches(id, 3),
        })
    }

    /// Lookup a segment without building an error.
    pub fn lookup(&self, id: &str) -> Option<&Segment> {
        self.by_id.get(id).map(|&index| &self.segments[index])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// All segments of a category, ordered by id.
    pub fn all_of_kind(&self, category: SegmentCategory) -> Vec<&Segment> {
        self.segments
            .iter()
            .filter(|segment| segment.category() == category)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn endpoints(&self) -> &EndpointIndex {
        &self.endpoints
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub(crate) fn segment_at(&self, index: usize) -> &Segment {
        &self.segments[index]
    }

    /// Return up to `limit` known ids that closely resemble `id`, best first.
    pub fn fuzzy_segment_matches(&self, id: &str, limit: usize) -> Vec<String> {
        let needle = id.to_ascii_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .segments
            .iter()
            .map(|segment| {
                let score = strsim::jaro_winkler(&needle, &segment.id.to_ascii_lowercase());
                (score, segment.id.as_str())
            })
            .filter(|(score, _)| *score >= FUZZY_MATCH_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, id)| id.to_string())
            .collect()
    }
}

/// Load a catalog from a JSON file on disk.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        return Err(Error::CatalogNotFound {
            path: path.to_path_buf(),
        });
    }
    debug!(path = %path.display(), "loading segment catalog");
    let file = File::open(path)?;
    Catalog::from_reader(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "lifts": [
            {"id": "lift-a", "name": "A", "verticalRise": 300, "duration": 5,
             "coordinates": [[6.0, 45.0, 1500], [6.0, 45.01, 1800]],
             "connectsTo": ["piste-b", "piste-b"]}
        ],
        "pistes": [
            {"id": "piste-b", "name": "B", "difficulty": "blue", "verticalDrop": 300,
             "length": 1000, "coordinates": [[6.0, 45.01], [6.001, 45.0]]},
            {"id": "piste-c", "name": "C", "difficulty": "freeride", "verticalDrop": 50,
             "length": 300, "coordinates": [[6.0, 45.0], [6.002, 45.0]], "bidirectional": true}
        ]
    }"#;

    #[test]
    fn decodes_tagged_kinds() {
        let catalog = Catalog::from_json_str(SAMPLE).expect("sample decodes");
        assert_eq!(catalog.len(), 3);

        let lift = catalog.get("lift-a").unwrap();
        assert!(lift.is_lift());
        assert_eq!(lift.difficulty(), None);
        assert_eq!(lift.entry().elevation, Some(1500.0));
        assert_eq!(lift.connects_to.as_ref().map(|c| c.len()), Some(1));

        let slope = catalog.get("piste-b").unwrap();
        assert_eq!(slope.difficulty(), Some(Difficulty::Blue));
        assert!(slope.connects_to.is_none());
    }

    #[test]
    fn unknown_difficulty_becomes_unrated() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        let slope = catalog.get("piste-c").unwrap();
        assert_eq!(slope.difficulty(), None);
        assert!(slope.within_difficulty(None));
        assert!(!slope.within_difficulty(Some(Difficulty::Black)));
        assert!((slope.estimated_minutes() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn all_of_kind_is_sorted_by_id() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        let slopes: Vec<_> = catalog
            .all_of_kind(SegmentCategory::Slope)
            .into_iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(slopes, vec!["piste-b", "piste-c"]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"{"lifts": [
            {"id": "lift-a", "duration": 5, "coordinates": [[6.0, 45.0], [6.0, 45.01]]},
            {"id": "lift-a", "duration": 6, "coordinates": [[6.1, 45.0], [6.1, 45.01]]}
        ]}"#;
        let err = Catalog::from_json_str(json).expect_err("duplicate rejected");
        assert!(err.to_string().contains("duplicate segment id lift-a"));
    }

    #[test]
    fn empty_geometry_is_rejected() {
        let json = r#"{"slopes": [
            {"id": "piste-x", "difficulty": "red", "length": 10, "coordinates": []}
        ]}"#;
        assert!(matches!(
            Catalog::from_json_str(json),
            Err(Error::CatalogValidation { .. })
        ));
    }

    #[test]
    fn negative_length_is_rejected() {
        let json = r#"{"slopes": [
            {"id": "piste-x", "difficulty": "red", "length": -10, "coordinates": [[6.0, 45.0]]}
        ]}"#;
        assert!(matches!(
            Catalog::from_json_str(json),
            Err(Error::CatalogValidation { .. })
        ));
    }

    #[test]
    fn unknown_id_suggests_close_matches() {
        let catalog = Catalog::from_json_str(SAMPLE).unwrap();
        match catalog.get("piste-bb") {
            Err(Error::SegmentNotFound { suggestions, .. }) => {
                assert_eq!(suggestions.first().map(String::as_str), Some("piste-b"));
            }
            other => panic!("expected SegmentNotFound, got {other:?}"),
        }
    }

    #[test]
    fn difficulty_ladder_is_ordered() {
        assert!(Difficulty::Green < Difficulty::Blue);
        assert!(Difficulty::Blue < Difficulty::Red);
        assert!(Difficulty::Red < Difficulty::Black);
        assert_eq!("Black".parse::<Difficulty>(), Ok(Difficulty::Black));
    }
}
