mod bounded;
pub use bounded::BoundedStrategy;
