pub mod reader;
pub mod stack_trace;
pub mod suite_handler;
pub mod time;
