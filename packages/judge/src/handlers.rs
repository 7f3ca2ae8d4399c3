pub mod judge;
pub mod submit;
