//! Longest-path distances on node-weighted DAGs.
//!
//! Distances follow the activity-on-node convention: the distance of a
//! vertex is the largest sum of predecessor weights along any path reaching
//! it, the vertex's own weight excluded.

use core::fmt;

use crate::data_structures::graphs::{Direction, Index, InOutAdjacencyArraysGraph};

/// Longest-path distances from the zero-in-degree vertices to every vertex,
/// by iterative source removal (Kahn's algorithm).
///
/// `dir` selects the traversal direction: `OUT` walks the arcs as stored,
/// `IN` walks the transposed graph (used for tail computations). For an arc
/// `u -> v` the relaxation is `dist[v] = max(dist[v], dist[u] + weight[u])`;
/// sources start at distance 0.
///
/// Returns [HasCycles] when the removal drains before every vertex was
/// visited.
pub fn longest_path_lengths<I: Index>(
    graph: &InOutAdjacencyArraysGraph<I>,
    weights: &[i64],
    dir: Direction,
) -> Result<Vec<i64>, HasCycles> {
    let n = graph.num_vertices().index();
    debug_assert_eq!(weights.len(), n);

    let mut pending_degrees = graph.degrees(dir.reversed());
    let mut sources: Vec<I> = graph
        .vertices()
        .filter(|v| pending_degrees[v.index()] == I::new(0))
        .collect();

    let mut dist = vec![0i64; n];
    let mut num_visited = 0;
    while let Some(u) = sources.pop() {
        num_visited += 1;
        let relaxed = dist[u.index()] + weights[u.index()];
        for &v in graph.neighbors(u, dir) {
            if dist[v.index()] < relaxed {
                dist[v.index()] = relaxed;
            }
            pending_degrees[v.index()] -= I::new(1);
            if pending_degrees[v.index()] == I::new(0) {
                sources.push(v);
            }
        }
    }

    if num_visited == n {
        Ok(dist)
    } else {
        Err(HasCycles)
    }
}

/// Tail of every vertex: the longest path from the vertex to the
/// zero-out-degree vertices, *inclusive* of the vertex's own weight.
pub fn tail_lengths<I: Index>(
    graph: &InOutAdjacencyArraysGraph<I>,
    weights: &[i64],
) -> Result<Vec<i64>, HasCycles> {
    let reverse = longest_path_lengths(graph, weights, Direction::IN)?;
    Ok(reverse
        .iter()
        .zip(weights)
        .map(|(dist, weight)| dist + weight)
        .collect())
}

#[derive(Debug, PartialEq, Eq)]
pub struct HasCycles;

impl fmt::Display for HasCycles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Graph is not a DAG and thus has no longest-path distances."
        )
    }
}
impl std::error::Error for HasCycles {}

#[cfg(test)]
mod test {
    use crate::data_structures::graphs::DirectedEdgeListGraph;

    use super::*;

    // a small series-parallel DAG: 0 fans out to 1 and 2, both join in 3
    const ARCS: [(u32, u32); 4] = [(0, 1), (0, 2), (1, 3), (2, 3)];
    const WEIGHTS: [i64; 4] = [2, 5, 3, 4];

    fn build(arcs: &[(u32, u32)]) -> InOutAdjacencyArraysGraph<u32> {
        InOutAdjacencyArraysGraph::from(&DirectedEdgeListGraph::with_arcs(4, arcs.to_vec()))
    }

    #[test]
    fn test_forward_distances() {
        let graph = build(&ARCS);
        let dist = longest_path_lengths(&graph, &WEIGHTS, Direction::OUT).unwrap();
        // vertex 3 is reached over the heavier branch through 1
        assert_eq!(dist, [0, 2, 2, 7]);
    }

    #[test]
    fn test_reverse_distances() {
        let graph = build(&ARCS);
        let dist = longest_path_lengths(&graph, &WEIGHTS, Direction::IN).unwrap();
        assert_eq!(dist, [9, 4, 4, 0]);
    }

    #[test]
    fn test_tails_include_own_weight() {
        let graph = build(&ARCS);
        let tails = tail_lengths(&graph, &WEIGHTS).unwrap();
        assert_eq!(tails, [11, 9, 7, 4]);
    }

    #[test]
    fn test_cycle_is_detected() {
        let mut arcs = ARCS.to_vec();
        arcs.push((3, 0));
        let graph = build(&arcs);
        assert_eq!(
            longest_path_lengths(&graph, &WEIGHTS, Direction::OUT),
            Err(HasCycles)
        );
        assert_eq!(tail_lengths(&graph, &WEIGHTS), Err(HasCycles));
    }
}
