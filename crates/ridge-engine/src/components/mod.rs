pub mod entity;
pub mod tag;
