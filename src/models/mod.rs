use serde::{Deserialize, Serialize};

pub mod category;
pub mod item;

pub use category::*;
pub use item::*;

/// Plain `{"message": ...}` body used for acknowledgements and errors alike
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
        }
    }
}
