pub mod add;
pub mod dispatch;
pub mod list;
pub mod remove;
pub mod status;
