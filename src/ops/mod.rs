pub mod alter;
pub mod build;
pub mod lookup;
pub mod transform;
