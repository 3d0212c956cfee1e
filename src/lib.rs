pub mod agent;
pub mod cli;
pub mod controls;
pub mod dom;
pub mod planning;
pub mod trace;
