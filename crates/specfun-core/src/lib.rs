pub mod common;
pub mod domain;
pub mod numerics;
pub mod regression;
