pub mod audit;
pub mod cluster;
pub mod model;
