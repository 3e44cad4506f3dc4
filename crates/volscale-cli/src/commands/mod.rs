pub mod event;
pub mod sweep;
