use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValueStrategy {
    Remove,
    Interpolate,
    BackwardForwardFill,
}

impl MissingValueStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            MissingValueStrategy::Remove => "Remove",
            MissingValueStrategy::Interpolate => "Interpolate",
            MissingValueStrategy::BackwardForwardFill => "Backward/Forward Filling",
        }
    }
}

impl fmt::Display for MissingValueStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MissingValueStrategy {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "remove" | "drop" => Ok(MissingValueStrategy::Remove),
            "interpolate" | "linear" => Ok(MissingValueStrategy::Interpolate),
            "backward/forward filling" | "backward-forward-fill" | "backward_forward_fill"
            | "fill" | "ffill-bfill" => Ok(MissingValueStrategy::BackwardForwardFill),
            other => Err(format!(
                "unknown missing-value strategy '{other}'; use remove, interpolate, or fill"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionUnit {
    Minutes,
    Hours,
}

impl ResolutionUnit {
    pub fn minutes(&self) -> i64 {
        match self {
            ResolutionUnit::Minutes => 1,
            ResolutionUnit::Hours => 60,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionUnit::Minutes => "minutes",
            ResolutionUnit::Hours => "hours",
        }
    }
}

impl fmt::Display for ResolutionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolutionUnit {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "minutes" | "minute" | "min" | "m" => Ok(ResolutionUnit::Minutes),
            "hours" | "hour" | "h" => Ok(ResolutionUnit::Hours),
            other => Err(format!("unknown resolution unit '{other}'; use minutes or hours")),
        }
    }
}

/// Target sampling step, always at least one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    count: u32,
    unit: ResolutionUnit,
}

impl Resolution {
    pub fn new(count: u32, unit: ResolutionUnit) -> Result<Self> {
        if count == 0 {
            return Err(PipelineError::InvalidResolution(format!(
                "count must be at least 1 {unit}"
            )));
        }
        Ok(Self { count, unit })
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn unit(&self) -> ResolutionUnit {
        self.unit
    }

    pub fn minutes(&self) -> i64 {
        i64::from(self.count) * self.unit.minutes()
    }

    pub fn step_micros(&self) -> i64 {
        self.minutes() * 60 * 1_000_000
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.count, self.unit)
    }
}

/// What to do with cells that survive sentinel normalization but are not numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CoercionPolicy {
    /// Turn them into missing values and count them.
    #[default]
    Lenient,
    /// Fail on the first one.
    Strict,
}

/// First row (in upload order) where the source marked data as not yet available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QualityBoundary {
    pub first_unavailable: Option<NaiveDateTime>,
    pub row: Option<usize>,
}

impl QualityBoundary {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn at(row: usize, timestamp: NaiveDateTime) -> Self {
        Self {
            first_unavailable: Some(timestamp),
            row: Some(row),
        }
    }

    pub fn is_present(&self) -> bool {
        self.first_unavailable.is_some()
    }
}
