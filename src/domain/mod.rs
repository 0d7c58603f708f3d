pub mod credential;
pub mod error;
pub mod run;
pub mod tenant;
