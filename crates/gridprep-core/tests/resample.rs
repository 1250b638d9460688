use chrono::{NaiveDate, NaiveDateTime};
use gridprep_core::resample::{native_interval_micros, resample};
use gridprep_core::timestamps::naive_to_micros;
use gridprep_core::{QualityBoundary, Resolution, ResolutionUnit, TimeSeriesTable};

const MINUTE: i64 = 60 * 1_000_000;

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 1, 1)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("valid timestamp")
}

fn table(points: &[((u32, u32), Option<f64>)]) -> TimeSeriesTable {
    let micros = points
        .iter()
        .map(|((hour, minute), _)| naive_to_micros(at(*hour, *minute)))
        .collect();
    let values = points.iter().map(|(_, value)| *value).collect();
    TimeSeriesTable::from_parts("MTU", micros, vec![("Load".to_string(), values)])
        .expect("table")
}

fn minutes(count: u32) -> Resolution {
    Resolution::new(count, ResolutionUnit::Minutes).expect("resolution")
}

#[test]
fn truncates_one_native_interval_before_the_boundary() -> gridprep_core::Result<()> {
    let series = table(&[
        ((0, 0), Some(10.0)),
        ((0, 15), Some(11.0)),
        ((0, 30), Some(12.0)),
    ]);
    let boundary = QualityBoundary::at(1, at(0, 15));

    let out = resample(&series, minutes(15), &boundary)?;
    assert_eq!(out.timestamps()?, vec![at(0, 0)]);
    assert_eq!(out.values("Load")?, vec![Some(10.0)]);
    Ok(())
}

#[test]
fn absent_boundary_keeps_every_row() -> gridprep_core::Result<()> {
    let series = table(&[((0, 0), Some(1.0)), ((0, 15), Some(2.0))]);
    let out = resample(&series, minutes(15), &QualityBoundary::absent())?;
    assert_eq!(out.len(), 2);
    Ok(())
}

#[test]
fn duplicate_timestamps_keep_the_first_row() -> gridprep_core::Result<()> {
    let series = table(&[
        ((0, 0), Some(5.0)),
        ((0, 0), Some(7.0)),
        ((0, 15), Some(9.0)),
    ]);

    let out = resample(&series, minutes(15), &QualityBoundary::absent())?;
    assert_eq!(out.timestamps()?, vec![at(0, 0), at(0, 15)]);
    assert_eq!(out.values("Load")?, vec![Some(5.0), Some(9.0)]);
    Ok(())
}

#[test]
fn native_resolution_is_idempotent() -> gridprep_core::Result<()> {
    let series = table(&[
        ((0, 0), Some(1.0)),
        ((0, 15), Some(4.0)),
        ((0, 30), Some(2.0)),
        ((0, 45), Some(8.0)),
    ]);

    let once = resample(&series, minutes(15), &QualityBoundary::absent())?;
    assert_eq!(once.timestamps()?, series.timestamps()?);
    assert_eq!(once.values("Load")?, series.values("Load")?);

    let twice = resample(&once, minutes(15), &QualityBoundary::absent())?;
    assert!(twice.frame().equals_missing(once.frame()));
    Ok(())
}

#[test]
fn upsampling_interpolates_on_a_constant_step() -> gridprep_core::Result<()> {
    let series = table(&[((0, 0), Some(0.0)), ((1, 0), Some(60.0)), ((2, 0), Some(0.0))]);

    let out = resample(&series, minutes(15), &QualityBoundary::absent())?;
    let micros = out.timestamp_micros()?;
    assert_eq!(micros.len(), 9);
    assert!(micros.windows(2).all(|pair| pair[1] - pair[0] == 15 * MINUTE));
    assert_eq!(
        out.values("Load")?,
        vec![
            Some(0.0),
            Some(15.0),
            Some(30.0),
            Some(45.0),
            Some(60.0),
            Some(45.0),
            Some(30.0),
            Some(15.0),
            Some(0.0),
        ]
    );
    Ok(())
}

#[test]
fn downsampling_picks_grid_instants() -> gridprep_core::Result<()> {
    let series = table(&[
        ((0, 0), Some(0.0)),
        ((0, 15), Some(1.0)),
        ((0, 30), Some(2.0)),
        ((0, 45), Some(3.0)),
        ((1, 0), Some(4.0)),
        ((1, 15), Some(5.0)),
    ]);

    let hourly = Resolution::new(1, ResolutionUnit::Hours).expect("resolution");
    let out = resample(&series, hourly, &QualityBoundary::absent())?;
    assert_eq!(out.timestamps()?, vec![at(0, 0), at(1, 0)]);
    assert_eq!(out.values("Load")?, vec![Some(0.0), Some(4.0)]);
    Ok(())
}

#[test]
fn unsorted_rows_are_ordered_before_gridding() -> gridprep_core::Result<()> {
    let series = table(&[
        ((0, 30), Some(3.0)),
        ((0, 0), Some(1.0)),
        ((0, 15), Some(2.0)),
    ]);

    let out = resample(&series, minutes(15), &QualityBoundary::absent())?;
    assert_eq!(out.timestamps()?, vec![at(0, 0), at(0, 15), at(0, 30)]);
    assert_eq!(out.values("Load")?, vec![Some(1.0), Some(2.0), Some(3.0)]);
    Ok(())
}

#[test]
fn gaps_in_a_column_interpolate_through_time() -> gridprep_core::Result<()> {
    let series = table(&[
        ((0, 0), None),
        ((0, 15), Some(2.0)),
        ((0, 30), None),
        ((0, 45), Some(4.0)),
    ]);

    let out = resample(&series, minutes(15), &QualityBoundary::absent())?;
    assert_eq!(
        out.values("Load")?,
        vec![None, Some(2.0), Some(3.0), Some(4.0)]
    );
    Ok(())
}

#[test]
fn empty_table_stays_empty() -> gridprep_core::Result<()> {
    let series = table(&[]);
    let out = resample(&series, minutes(15), &QualityBoundary::at(0, at(0, 0)))?;
    assert!(out.is_empty());
    assert_eq!(out.value_columns(), vec!["Load".to_string()]);
    Ok(())
}

#[test]
fn zero_count_resolution_is_rejected() {
    assert!(Resolution::new(0, ResolutionUnit::Hours).is_err());
    assert_eq!(native_interval_micros(&[0, 15 * MINUTE]), 15 * MINUTE);
}
