pub mod engine;
pub mod generator;
pub mod pool;

pub use crate::domain::model::{CardLayout, CardPool, GenerationRequest, Topic};
pub use crate::domain::ports::{ConfigProvider, ItemSource, SessionCache};
pub use crate::utils::error::Result;
