pub mod jobshop;
pub mod numbers;
pub mod permutations;
