pub mod base;
pub mod mysql;
pub mod postgres;
pub mod query;
