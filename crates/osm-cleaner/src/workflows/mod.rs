pub mod audit;
pub mod export;
pub mod phones;
pub mod streets;
