use super::Index;

/// An arc direction relative to a vertex.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    OUT,
    IN,
}

impl Direction {
    /// Gets the vertex of the arc that is identified with this direction.
    /// `OUT` gives the source vertex of the arc, `IN` the target vertex.
    pub fn vertex<I: Index>(&self, (from, to): &(I, I)) -> I {
        match self {
            Direction::OUT => *from,
            Direction::IN => *to,
        }
    }

    /// Gets the vertex of the arc that is *not* identified with this direction.
    /// `OUT` gives the target vertex of the arc, `IN` the source vertex.
    pub fn other<I: Index>(&self, (from, to): &(I, I)) -> I {
        match self {
            Direction::OUT => *to,
            Direction::IN => *from,
        }
    }

    /// The opposite direction.
    pub fn reversed(&self) -> Direction {
        match self {
            Direction::OUT => Direction::IN,
            Direction::IN => Direction::OUT,
        }
    }
}
