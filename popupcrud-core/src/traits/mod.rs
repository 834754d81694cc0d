//! Page, transport and classification abstraction trait definitions

mod classifier;
mod page;
mod transport;

pub use classifier::{MarkupClassifier, ResponseClassifier};
pub use page::Page;
pub use transport::Transport;
