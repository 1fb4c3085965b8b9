pub mod cursor;
pub mod order;
pub mod page;
pub mod take;
