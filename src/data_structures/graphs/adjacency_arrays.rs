use super::{DirectedEdgeListGraph, Direction, Index};

/// A directed graph stored as arrays of out- and in-adjacencies.
///
/// All out-adjacencies live in a single array, sorted by source vertex; per
/// vertex we keep the offset of its first adjacency, the end being the next
/// vertex's offset (or the end of the array). The transposed graph is stored
/// the same way, trading space for constant-time access to in-degrees and
/// in-neighbors. The layout follows the "standard representation" of \[1\].
///
/// \[1\] F. Kammer and A. Sajenko, “Linear-Time In-Place DFS and BFS on the
/// Word RAM,” in Algorithms and Complexity, 2019, doi:
/// [10.1007/978-3-030-17402-6_24](https://doi.org/10.1007/978-3-030-17402-6_24).
#[derive(Clone, Debug)]
pub struct InOutAdjacencyArraysGraph<I: Index> {
    out: AdjacencyArray<I>,
    rev: AdjacencyArray<I>,
}

impl<I: Index> InOutAdjacencyArraysGraph<I> {
    pub fn num_vertices(&self) -> I {
        I::new(self.out.offsets.len())
    }

    pub fn num_arcs(&self) -> I {
        I::new(self.out.adjacencies.len())
    }

    pub fn degree(&self, v: I, dir: Direction) -> I {
        let (start, end) = self.half(dir).bounds(v);
        end - start
    }

    /// The neighbors of `v`: successors for `OUT`, predecessors for `IN`.
    pub fn neighbors(&self, v: I, dir: Direction) -> &[I] {
        let half = self.half(dir);
        let (start, end) = half.bounds(v);
        &half.adjacencies[start.index()..end.index()]
    }

    pub fn degrees(&self, dir: Direction) -> Vec<I> {
        self.vertices().map(|v| self.degree(v, dir)).collect()
    }

    pub fn vertices(&self) -> I::IndexIterator {
        I::new(0).range(self.num_vertices())
    }

    fn half(&self, dir: Direction) -> &AdjacencyArray<I> {
        match dir {
            Direction::OUT => &self.out,
            Direction::IN => &self.rev,
        }
    }
}

impl<I: Index> From<&DirectedEdgeListGraph<I>> for InOutAdjacencyArraysGraph<I> {
    fn from(graph: &DirectedEdgeListGraph<I>) -> Self {
        Self {
            out: AdjacencyArray::from_arcs(graph, Direction::OUT),
            rev: AdjacencyArray::from_arcs(graph, Direction::IN),
        }
    }
}

#[derive(Clone, Debug)]
struct AdjacencyArray<I: Index> {
    offsets: Box<[I]>,
    adjacencies: Box<[I]>,
}

impl<I: Index> AdjacencyArray<I> {
    fn from_arcs(graph: &DirectedEdgeListGraph<I>, dir: Direction) -> Self {
        // prefix-sum the degrees into offsets
        let mut offsets = graph.degrees(dir);
        let mut current = I::new(0);
        for entry in offsets.iter_mut() {
            let degree = *entry;
            *entry = current;
            current += degree;
        }

        // bucket the arcs, advancing each vertex's offset while filling
        let mut adjacencies = vec![I::new(0); graph.num_arcs().index()].into_boxed_slice();
        for arc in graph.arcs() {
            let vertex = dir.vertex(arc);
            adjacencies[offsets[vertex.index()].index()] = dir.other(arc);
            offsets[vertex.index()] += I::new(1);
        }

        // the fill moved every offset one vertex ahead; shift them back
        offsets.rotate_right(1);
        offsets[0] = I::new(0);

        Self {
            offsets,
            adjacencies,
        }
    }

    fn bounds(&self, v: I) -> (I, I) {
        let start = self.offsets[v.index()];
        let end = match self.offsets.get(v.index() + 1) {
            Some(x) => *x,
            None => I::new(self.adjacencies.len()),
        };
        (start, end)
    }
}
