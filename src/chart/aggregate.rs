//! Grouping helpers for bar and pie charts, run as polars group-bys

use polars::prelude::*;

const KEY: &str = "__key";
const ORDER: &str = "__order";
const ROW: &str = "__row";
const COUNT: &str = "__count";
const MEAN: &str = "__mean";

/// Frequency of each distinct value of `column` in display form, most
/// frequent first. Ties keep the order in which the values first appear;
/// missing cells are skipped.
pub fn value_counts(frame: &DataFrame, column: &str) -> PolarsResult<Vec<(String, usize)>> {
    profiling::scope!("value_counts");

    let counted = frame
        .clone()
        .lazy()
        .select([col(column).cast(DataType::String).alias(KEY)])
        .with_row_index(ROW, None)
        .filter(col(KEY).is_not_null())
        .group_by([col(KEY)])
        .agg([col(ROW).count().alias(COUNT), col(ROW).first()])
        .sort_by_exprs(
            [col(COUNT), col(ROW)],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )
        .collect()?;

    let keys = counted.column(KEY)?.as_materialized_series().str()?;
    let counts = counted
        .column(COUNT)?
        .as_materialized_series()
        .cast(&DataType::UInt64)?;

    Ok(keys
        .into_iter()
        .zip(counts.u64()?)
        .filter_map(|(key, count)| Some((key?.to_string(), count? as usize)))
        .collect())
}

/// Mean of `value` per distinct `key`, in the key column's own sort order
/// (numeric, chronological or lexical). Rows with a missing key are dropped
/// and NaN values are ignored; a group with no finite value has mean NaN.
pub fn group_means(frame: &DataFrame, key: &str, value: &str) -> PolarsResult<Vec<(String, f64)>> {
    profiling::scope!("group_means");

    let values = col(value).cast(DataType::Float64);
    let grouped = frame
        .clone()
        .lazy()
        .select([
            col(key).cast(DataType::String).alias(KEY),
            col(key).alias(ORDER),
            values.fill_nan(lit(NULL)).alias(MEAN),
        ])
        .filter(col(KEY).is_not_null())
        .group_by([col(KEY)])
        .agg([col(ORDER).first(), col(MEAN).mean()])
        .sort_by_exprs([col(ORDER)], SortMultipleOptions::default())
        .collect()?;

    let keys = grouped.column(KEY)?.as_materialized_series().str()?;
    let means = grouped
        .column(MEAN)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;

    Ok(keys
        .into_iter()
        .zip(means.f64()?)
        .filter_map(|(key, mean)| Some((key?.to_string(), mean.unwrap_or(f64::NAN))))
        .collect())
}
