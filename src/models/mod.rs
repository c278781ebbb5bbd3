pub mod car;
pub mod engine;

pub use car::{Car, CarRequest};
pub use engine::{Engine, EngineRequest};
