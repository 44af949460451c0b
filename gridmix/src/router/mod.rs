pub mod admin;
pub mod bundle;
pub mod mix;
pub mod series;

pub mod util;
