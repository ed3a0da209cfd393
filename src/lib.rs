pub mod constants;
pub mod context;
pub mod dispatch;
pub mod displayer;
pub mod junit;
pub mod print;
pub mod project;
pub mod report_dir;
pub mod rerun;
pub mod session;
