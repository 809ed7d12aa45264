//! Model loading and inference backends

pub mod inference;
pub mod loader;
pub mod remote;

pub use inference::{LocalGraphPredictor, Predictor};
pub use loader::{GraphModel, ModelLoader};
pub use remote::RemotePredictor;
