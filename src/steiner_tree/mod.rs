pub mod builder;
pub mod candidates;
pub mod dreyfus_wagner;
pub mod parallel;
pub mod search;
pub mod tree;
