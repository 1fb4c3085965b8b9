pub mod codec;
pub mod columns;
pub mod cursor;
pub mod error;
pub mod lazy;
pub mod page;
pub mod settings;

#[cfg(test)]
pub(crate) mod testing;
