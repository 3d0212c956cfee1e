pub mod control_model;
pub mod date;
pub mod detector;
pub mod recommender;
