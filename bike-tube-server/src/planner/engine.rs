//! Label-setting shortest-path search over the layered graph.
//!
//! Nodes are the graph's layer nodes plus the virtual start and end of one
//! request, addressed by dense index: layer `i` is `i`, the start is `n`
//! and the end is `n + 1`. Labels are `(cost, edge count)` compared
//! lexicographically, so among equally fast paths the one with fewer edges
//! wins; the heap breaks any remaining tie by node index.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use chrono::Duration;

use crate::network::{LayerIndex, TransitGraph};

use super::overlay::Overlay;
use super::request::RoutingParams;

/// A node of the per-request search graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Node {
    Start,
    End,
    Layer(LayerIndex),
}

/// Which edge a path step used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Start to a layer, via `overlay.origin()[i]`.
    Board(usize),
    /// Layer to end, via `overlay.destination()[i]`.
    Alight(usize),
    /// Start straight to end.
    Direct,
    /// Scheduled running between adjacent stations on one line.
    Travel,
    /// Between two lines at one station.
    Interchange,
}

/// One step of the optimal path, with the weight actually charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathEdge {
    pub from: Node,
    pub to: Node,
    pub kind: EdgeKind,
    pub weight: Duration,
}

/// The result of a successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Minimum cumulative weight from start to end.
    pub total: Duration,
    /// Edges from start to end, in travel order.
    pub path: Vec<PathEdge>,
    /// Nodes finalised before the end was reached.
    pub settled: usize,
}

/// Weights that depend on the request rather than the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostModel {
    pub entry_buffer: Duration,
    pub exit_buffer: Duration,
    pub line_change: Duration,
}

impl CostModel {
    pub fn from_params(params: &RoutingParams) -> Self {
        Self {
            entry_buffer: params.entry_buffer(),
            exit_buffer: params.exit_buffer(),
            line_change: params.line_change,
        }
    }
}

type Label = (Duration, u32);

struct Search<'a> {
    graph: &'a TransitGraph,
    overlay: &'a Overlay,
    costs: CostModel,
    labels: Vec<Option<Label>>,
    preds: Vec<Option<(usize, EdgeKind, Duration)>>,
    settled: Vec<bool>,
    heap: BinaryHeap<Reverse<(Duration, u32, usize)>>,
}

impl<'a> Search<'a> {
    fn start_index(&self) -> usize {
        self.graph.layer_count()
    }

    fn end_index(&self) -> usize {
        self.graph.layer_count() + 1
    }

    fn node(&self, idx: usize) -> Node {
        let n = self.graph.layer_count();
        if idx == n {
            Node::Start
        } else if idx == n + 1 {
            Node::End
        } else {
            Node::Layer(LayerIndex(idx))
        }
    }

    fn relax(&mut self, from: usize, to: usize, kind: EdgeKind, weight: Duration) {
        if self.settled[to] {
            return;
        }
        let Some((cost, edges)) = self.labels[from] else {
            return;
        };
        // An overflowing cost is never better than any real label.
        let Some(total) = cost.checked_add(&weight) else {
            return;
        };
        let candidate = (total, edges + 1);
        if self.labels[to].is_none_or(|current| candidate < current) {
            self.labels[to] = Some(candidate);
            self.preds[to] = Some((from, kind, weight));
            self.heap.push(Reverse((candidate.0, candidate.1, to)));
        }
    }

    fn expand_start(&mut self) {
        let start = self.start_index();
        let graph = self.graph;
        let overlay = self.overlay;
        for (i, access) in overlay.origin().iter().enumerate() {
            let Some(weight) = access.leg.duration.checked_add(&self.costs.entry_buffer) else {
                continue;
            };
            for &layer in graph.station(access.station).layers() {
                self.relax(start, layer.0, EdgeKind::Board(i), weight);
            }
        }
        if let Some(direct) = overlay.direct() {
            self.relax(start, self.end_index(), EdgeKind::Direct, direct.duration);
        }
    }

    fn expand_layer(&mut self, layer: LayerIndex) {
        let graph = self.graph;
        for edge in graph.travel_edges(layer) {
            self.relax(layer.0, edge.to.0, EdgeKind::Travel, edge.duration);
        }
        for other in graph.interchanges(layer) {
            self.relax(layer.0, other.0, EdgeKind::Interchange, self.costs.line_change);
        }
        let overlay = self.overlay;
        let station = graph.layer(layer).station;
        if let Some(i) = overlay.destination_from(station) {
            let leg = &overlay.destination()[i].leg;
            if let Some(weight) = leg.duration.checked_add(&self.costs.exit_buffer) {
                self.relax(layer.0, self.end_index(), EdgeKind::Alight(i), weight);
            }
        }
    }

    fn run(mut self) -> Option<SearchOutcome> {
        let start = self.start_index();
        let end = self.end_index();
        self.labels[start] = Some((Duration::zero(), 0));
        self.heap.push(Reverse((Duration::zero(), 0, start)));

        let mut settled_count = 0;
        while let Some(Reverse((cost, edges, idx))) = self.heap.pop() {
            if self.settled[idx] || self.labels[idx] != Some((cost, edges)) {
                continue;
            }
            self.settled[idx] = true;
            settled_count += 1;

            if idx == end {
                return Some(SearchOutcome {
                    total: cost,
                    path: self.path_to(end),
                    settled: settled_count,
                });
            }

            match self.node(idx) {
                Node::Start => self.expand_start(),
                Node::Layer(layer) => self.expand_layer(layer),
                Node::End => {}
            }
        }

        None
    }

    fn path_to(&self, end: usize) -> Vec<PathEdge> {
        let mut path = Vec::new();
        let mut current = end;
        while let Some((prev, kind, weight)) = self.preds[current] {
            path.push(PathEdge {
                from: self.node(prev),
                to: self.node(current),
                kind,
                weight,
            });
            current = prev;
        }
        path.reverse();
        path
    }
}

/// Find the cheapest path from the virtual start to the virtual end.
///
/// Returns `None` when the frontier is exhausted without reaching the end.
pub fn shortest_path(
    graph: &TransitGraph,
    overlay: &Overlay,
    costs: CostModel,
) -> Option<SearchOutcome> {
    let nodes = graph.layer_count() + 2;
    Search {
        graph,
        overlay,
        costs,
        labels: vec![None; nodes],
        preds: vec![None; nodes],
        settled: vec![false; nodes],
        heap: BinaryHeap::new(),
    }
    .run()
}
