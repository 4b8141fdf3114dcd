pub mod aggregate;
pub mod context;
pub mod cursor;
pub mod sample;
