pub mod entity;
pub mod row;
