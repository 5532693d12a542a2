pub mod delta;
pub mod mock;

pub use delta::{DeltaSource, SeededDelta, ThreadRngDelta};
pub use mock::{generate_mock_prediction, PREDICTION_DELTA};
