use crate::error::ShapeError;
use crate::shape::{Record, Shape};

impl Shape {
    /// Declared column names in slot order.
    pub fn column_names(&self) -> Vec<String> {
        self.slots().iter().map(|slot| slot.name.clone()).collect()
    }
}

/// Column names of `R`, e.g. for writing a header row.
///
/// A `#[csv(rename = "...")]` annotation replaces the field identifier.
pub fn column_names<R: Record>() -> Result<Vec<String>, ShapeError> {
    Ok(R::shape()?.column_names())
}
