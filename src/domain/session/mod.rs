//! Media session state

mod mode;

pub use mode::SessionMode;
