mod input_buffer;
mod predictor;

pub use input_buffer::{InputBuffer, InputRecord};
pub use predictor::Predictor;
