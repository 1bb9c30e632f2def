use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    Avg,
    Min,
    Max,
}

impl AggregateOp {
    pub const ALL: [AggregateOp; 3] = [AggregateOp::Avg, AggregateOp::Min, AggregateOp::Max];

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateOp::Avg => "avg",
            AggregateOp::Min => "min",
            AggregateOp::Max => "max",
        }
    }

    /// SQL aggregate function applied to the temperature column.
    pub fn sql_function(&self) -> &'static str {
        match self {
            AggregateOp::Avg => "AVG",
            AggregateOp::Min => "MIN",
            AggregateOp::Max => "MAX",
        }
    }

    /// Parses the optional `operation` query parameter.
    pub fn from_param(param: Option<&str>) -> Result<Self, AppError> {
        param
            .ok_or(AppError::UnsupportedOperation)
            .and_then(|op| op.parse())
    }
}

impl FromStr for AggregateOp {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avg" => Ok(AggregateOp::Avg),
            "min" => Ok(AggregateOp::Min),
            "max" => Ok(AggregateOp::Max),
            _ => Err(AppError::UnsupportedOperation),
        }
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
