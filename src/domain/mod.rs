pub mod catalog;
pub mod errors;
pub mod feedback;
pub mod order;
pub mod ports;
pub mod pricing;
pub mod quantity;
