use polars::prelude::*;

use crate::error::{PipelineError, Result};
use crate::types::CoercionPolicy;

/// Float values of a column plus how many present cells had to be nulled.
pub(crate) struct Coerced {
    pub values: Vec<Option<f64>>,
    pub nulled: usize,
}

pub(crate) fn coerce_numeric(column: &Column, policy: CoercionPolicy) -> Result<Coerced> {
    if column.dtype() != &DataType::String {
        let cast = column.cast(&DataType::Float64)?;
        let values = cast
            .f64()?
            .into_iter()
            .map(|value| value.filter(|v| !v.is_nan()))
            .collect();
        return Ok(Coerced { values, nulled: 0 });
    }

    let strings = column.str()?;
    let mut values = Vec::with_capacity(strings.len());
    let mut nulled = 0;

    for (row, cell) in strings.into_iter().enumerate() {
        let Some(text) = cell else {
            values.push(None);
            continue;
        };
        match text.trim().parse::<f64>() {
            Ok(parsed) if !parsed.is_nan() => values.push(Some(parsed)),
            Ok(_) => values.push(None),
            Err(_) => {
                if policy == CoercionPolicy::Strict {
                    return Err(PipelineError::NonNumeric {
                        column: column.name().to_string(),
                        row,
                        value: text.to_string(),
                    });
                }
                nulled += 1;
                values.push(None);
            }
        }
    }

    Ok(Coerced { values, nulled })
}
