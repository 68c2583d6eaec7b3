pub mod base;
pub mod manager;
pub mod order;
pub mod rank;
pub mod style;
