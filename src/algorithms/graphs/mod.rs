mod longest_path;

pub use longest_path::{longest_path_lengths, tail_lengths, HasCycles};
