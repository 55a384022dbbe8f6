use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// An update was requested with no fields to assign.
    #[error("No data")]
    NoData,
}
