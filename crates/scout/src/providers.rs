pub mod langgraph;
pub mod mock;
pub mod utils;
