pub mod estimator;
pub mod region;
pub mod simulation_service;
