use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::catalog::{Catalog, Difficulty};
use crate::config::EngineConfig;
use crate::connectivity::ConnectivityResolver;
use crate::geo::Coordinate;

/// Cooperative cancellation flag shared between a caller and a running search.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that any search holding this token stops at its next expansion.
    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// Limits applied to a single search.
#[derive(Debug, Clone)]
pub struct SearchBudget {
    pub max_iterations: usize,
    pub deadline: Option<Instant>,
    pub cancellation: Option<CancellationToken>,
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self::iterations(crate::config::DEFAULT_MAX_ITERATIONS)
    }
}

impl SearchBudget {
    pub fn iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            deadline: None,
            cancellation: None,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::iterations(config.max_iterations)
    }

    /// Stop the search once `timeout` has elapsed from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    fn interrupted(&self) -> bool {
        if let Some(token) = &self.cancellation {
            if token.is_cancelled() {
                return true;
            }
        }
        self.deadline
            .map(|deadline| Instant::now() >= deadline)
            .unwrap_or(false)
    }
}

/// Result of a low-level search over catalog positions.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    /// Path of catalog positions in traversal order and its cost in minutes.
    Found {
        path: Vec<usize>,
        minutes: f64,
        iterations: usize,
    },
    /// Open list drained without reaching the goal set.
    Exhausted { iterations: usize },
    /// Iteration cap reached first.
    BudgetExceeded { iterations: usize },
    /// Cancelled by token or deadline.
    Cancelled { iterations: usize },
}

/// A* over the implicit segment graph.
///
/// Nodes are catalog positions. A node's cost `g` includes traversing the
/// node itself, so seeds start at their own travel time.
pub struct AStarSearch<'a> {
    resolver: ConnectivityResolver<'a>,
    max_difficulty: Option<Difficulty>,
    heuristic_speed_kmh: f64,
}

impl<'a> AStarSearch<'a> {
    pub fn new(
        resolver: ConnectivityResolver<'a>,
        max_difficulty: Option<Difficulty>,
        heuristic_speed_kmh: f64,
    ) -> Self {
        Self {
            resolver,
            max_difficulty,
            heuristic_speed_kmh,
        }
    }

    fn catalog(&self) -> &'a Catalog {
        self.resolver.catalog()
    }

    fn admissible(&self, node: usize) -> bool {
        self.catalog()
            .segment_at(node)
            .within_difficulty(self.max_difficulty)
    }

    fn cost(&self, node: usize) -> f64 {
        self.catalog().segment_at(node).estimated_minutes()
    }

    /// Optimistic minutes from the exit of `node` to the goal coordinate.
    ///
    /// The final segment may end anywhere within the connection threshold of
    /// the goal, so that slack is removed from the straight-line distance.
    fn heuristic(&self, node: usize, goal: &Coordinate) -> f64 {
        if self.heuristic_speed_kmh <= 0.0 {
            return 0.0;
        }
        let meters = self
            .catalog()
            .segment_at(node)
            .exit_points()
            .iter()
            .map(|exit| exit.distance_to(goal))
            .fold(f64::INFINITY, f64::min);
        let remaining = (meters - self.resolver.threshold_m()).max(0.0);
        remaining / 1000.0 / self.heuristic_speed_kmh * 60.0
    }

    /// Run the search from `seeds` until a member of `goals` is popped.
    pub fn run(
        &self,
        seeds: &[usize],
        goals: &HashSet<usize>,
        goal: &Coordinate,
        budget: &SearchBudget,
    ) -> SearchResult {
        let mut g_score: HashMap<usize, f64> = HashMap::new();
        let mut parents: HashMap<usize, Option<usize>> = HashMap::new();
        let mut queue = BinaryHeap::new();

        for &seed in seeds {
            if !self.admissible(seed) {
                continue;
            }
            let cost = self.cost(seed);
            if cost < *g_score.get(&seed).unwrap_or(&f64::INFINITY) {
                g_score.insert(seed, cost);
                parents.insert(seed, None);
                queue.push(AStarEntry::new(seed, cost, self.heuristic(seed, goal)));
            }
        }

        let mut iterations = 0usize;
        while let Some(entry) = queue.pop() {
            let current_score = match g_score.get(&entry.node) {
                Some(score) if *score < entry.cost.0 => continue,
                Some(score) => *score,
                None => continue,
            };

            if goals.contains(&entry.node) {
                debug!(iterations, minutes = current_score, "search reached goal set");
                return SearchResult::Found {
                    path: reconstruct_path(&parents, entry.node),
                    minutes: current_score,
                    iterations,
                };
            }

            if iterations >= budget.max_iterations {
                debug!(iterations, "search budget exhausted");
                return SearchResult::BudgetExceeded { iterations };
            }
            if budget.interrupted() {
                debug!(iterations, "search cancelled");
                return SearchResult::Cancelled { iterations };
            }
            iterations += 1;

            for next in self.resolver.exit_connection_indices(entry.node) {
                if !self.admissible(next) {
                    continue;
                }

                let tentative_g = current_score + self.cost(next);
                if tentative_g < *g_score.get(&next).unwrap_or(&f64::INFINITY) {
                    g_score.insert(next, tentative_g);
                    parents.insert(next, Some(entry.node));
                    queue.push(AStarEntry::new(
                        next,
                        tentative_g,
                        self.heuristic(next, goal),
                    ));
                }
            }
        }

        debug!(iterations, "search space exhausted");
        SearchResult::Exhausted { iterations }
    }
}

fn reconstruct_path(parents: &HashMap<usize, Option<usize>>, goal: usize) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        current = parents.get(&node).copied().flatten();
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct AStarEntry {
    node: usize,
    cost: FloatOrd,
    estimate: FloatOrd,
}

impl AStarEntry {
    fn new(node: usize, cost: f64, heuristic: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            estimate: FloatOrd(cost + heuristic),
        }
    }
}

impl Ord for AStarEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by estimate.
        other
            .estimate
            .cmp(&self.estimate)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for AStarEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Segment, SegmentKind};
    use crate::geo::offset_meters;

    fn goal() -> Coordinate {
        Coordinate::new(8.0, 46.5)
    }

    /// Lift ending `exit_north` metres north of the goal, linked only to `next`.
    fn linked_lift(id: &str, minutes: f64, exit_north: f64, next: &[&str]) -> Segment {
        Segment {
            id: id.to_string(),
            name: id.to_string(),
            kind: SegmentKind::Lift {
                lift_type: None,
                vertical_rise: 0.0,
                duration_minutes: minutes,
            },
            geometry: vec![
                offset_meters(&goal(), -500.0, exit_north),
                offset_meters(&goal(), 0.0, exit_north),
            ],
            connects_to: Some(next.iter().map(|id| id.to_string()).collect()),
            bidirectional: false,
        }
    }

    /// Slow direct lift `a-x` and quick lift `b-y` both feed `c-m`, which feeds `d-t`.
    ///
    /// `b-y` ends `detour_north` metres from the goal, so with a 1 m/min
    /// heuristic its estimate exceeds its true remaining cost.
    fn merge_catalog(detour_north: f64) -> Catalog {
        Catalog::from_segments(vec![
            linked_lift("a-x", 5.0, 0.0, &["c-m"]),
            linked_lift("b-y", 1.0, detour_north, &["c-m"]),
            linked_lift("c-m", 1.0, 0.0, &["d-t"]),
            linked_lift("d-t", 1.0, 0.0, &[]),
        ])
        .expect("catalog builds")
    }

    fn slow_search(catalog: &Catalog) -> AStarSearch<'_> {
        let resolver = ConnectivityResolver::new(catalog, &EngineConfig::default());
        // 0.06 km/h is one metre per minute.
        AStarSearch::new(resolver, None, 0.06)
    }

    fn position(catalog: &Catalog, id: &str) -> usize {
        catalog.index_of(id).expect("segment present")
    }

    #[test]
    fn heap_pops_lowest_estimate_first() {
        let mut heap = BinaryHeap::new();
        heap.push(AStarEntry::new(1, 5.0, 5.0));
        heap.push(AStarEntry::new(2, 1.0, 2.0));
        heap.push(AStarEntry::new(3, 4.0, 0.0));
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.node)).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn heap_breaks_ties_by_node_position() {
        let mut heap = BinaryHeap::new();
        heap.push(AStarEntry::new(9, 1.0, 1.0));
        heap.push(AStarEntry::new(4, 2.0, 0.0));
        assert_eq!(heap.pop().map(|e| e.node), Some(4));
    }

    #[test]
    fn reconstruct_follows_parents_to_seed() {
        let parents = HashMap::from([(1, None), (4, Some(1)), (7, Some(4))]);
        assert_eq!(reconstruct_path(&parents, 7), vec![1, 4, 7]);
    }

    #[test]
    fn cancelled_token_interrupts_budget() {
        let token = CancellationToken::new();
        let budget = SearchBudget::iterations(10).with_cancellation(token.clone());
        assert!(!budget.interrupted());
        token.cancel();
        assert!(budget.interrupted());
    }

    #[test]
    fn elapsed_deadline_interrupts_budget() {
        let budget = SearchBudget::iterations(10).with_timeout(Duration::ZERO);
        assert!(budget.interrupted());
    }

    #[test]
    fn expanded_node_is_reopened_when_a_cheaper_parent_appears() {
        // f(a-x) = 5, f(c-m via a-x) = 6, f(b-y) = 6.5, f(d-t via a-x) = 7.
        let catalog = merge_catalog(55.5);
        let search = slow_search(&catalog);
        let seeds = [position(&catalog, "a-x"), position(&catalog, "b-y")];
        let goals = HashSet::from([position(&catalog, "d-t")]);

        let result = search.run(&seeds, &goals, &goal(), &SearchBudget::iterations(100));

        let (path, minutes, iterations) = match result {
            SearchResult::Found {
                path,
                minutes,
                iterations,
            } => (path, minutes, iterations),
            other => panic!("expected a route, got {other:?}"),
        };
        let ids: Vec<&str> = path
            .iter()
            .map(|&node| catalog.segment_at(node).id.as_str())
            .collect();
        assert_eq!(ids, vec!["b-y", "c-m", "d-t"]);
        assert!((minutes - 3.0).abs() < 1e-9, "minutes was {minutes}");
        // a-x, c-m, b-y, then c-m a second time.
        assert_eq!(iterations, 4);
    }

    #[test]
    fn superseded_queue_entries_are_not_expanded() {
        // b-y pops before c-m, so c-m is queued at 6 then again at 2.
        let catalog = merge_catalog(54.5);
        let search = slow_search(&catalog);
        let seeds = [position(&catalog, "a-x"), position(&catalog, "b-y")];

        let result = search.run(
            &seeds,
            &HashSet::new(),
            &goal(),
            &SearchBudget::iterations(100),
        );

        // a-x, b-y, c-m, d-t; the stale c-m entry is dropped without expanding.
        assert_eq!(result, SearchResult::Exhausted { iterations: 4 });
    }
}
