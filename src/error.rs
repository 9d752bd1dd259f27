use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PercolationError
{
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Index {index} out of range for {len} elements")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum ParameterError
{
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Bad delimiter on line {line}: expected \"name: value\"")]
    BadDelimiter { line: usize },
    #[error("Could not parse \"{name}\" from \"{value}\"")]
    Parse { name: &'static str, value: String },
}
