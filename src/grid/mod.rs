pub mod axis;
pub mod evaluator;
