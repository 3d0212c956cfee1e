pub mod hints;
pub mod plan_model;
pub mod planner;
pub mod service;
