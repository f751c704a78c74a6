pub mod estimate;
pub mod simulation;
