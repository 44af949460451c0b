pub mod flows;
pub mod generation;
