pub mod factory;
pub mod fill;
pub mod fill_value_cursor;
pub mod record;

pub use factory::{OutputColumn, SampleByFillValueFactory, SampleByPlan};
pub use fill::placeholder_functions;
pub use fill_value_cursor::SampleByFillValueCursor;
pub use record::{RecordFunction, RecordView, SharedTimestamp, SplitRecord};

#[cfg(test)]
mod fill_test;
#[cfg(test)]
mod record_test;
