// src/io/features.rs

use crate::error::Result;
use crate::io::{open_required, read_records};
use crate::model::series::{FeatureTable, SeriesPoint};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Reads the weekly feature table produced by the ETL.
///
/// Expected columns: store_id, product_id, year, week, units_sold,
/// is_holiday, price, lag_1, lag_2, lag_4, lag_52, rollmean_4, rollmean_8,
/// rollmean_12, sin_woy, cos_woy. Lag and rolling cells may be empty, and
/// the lag_52 column may be absent altogether.
pub fn read_feature_table<R: Read>(reader: R) -> Result<FeatureTable> {
    let points: Vec<SeriesPoint> = read_records(reader)?;
    FeatureTable::from_points(points)
}

/// Loads the feature table from disk. A missing file is
/// [`crate::error::PlannerError::MissingData`]: the ETL never ran.
pub fn load_feature_table(path: &Path) -> Result<FeatureTable> {
    let file = open_required(path, "feature table")?;
    let table = read_feature_table(file)?;
    info!(
        path = %path.display(),
        rows = table.row_count(),
        sku_locations = table.iter().count(),
        "loaded feature table"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlannerError;
    use crate::model::series::SkuLocation;

    const HEADER: &str = "store_id,product_id,year,week,units_sold,is_holiday,price,lag_1,lag_2,lag_4,lag_52,rollmean_4,rollmean_8,rollmean_12,sin_woy,cos_woy";

    #[test]
    fn parses_rows_with_missing_lags() {
        let csv = format!(
            "{}\nS001,P001,2024,2,7,0,9.99,5,,,,,,,0.24,0.97\nS001,P001,2024,1,5,1,9.99,,,,,,,,0.12,0.99\n",
            HEADER
        );
        let table = read_feature_table(csv.as_bytes()).unwrap();
        let series = table.series(&SkuLocation::new("S001", "P001")).unwrap();
        assert_eq!(series.len(), 2);
        let last = series.last().unwrap();
        assert_eq!(last.week, 2);
        assert_eq!(last.lag_1, Some(5.0));
        assert_eq!(last.lag_52, None);
        assert_eq!(series.points()[0].is_holiday, 1.0);
    }

    #[test]
    fn lag_52_column_is_optional() {
        let csv = "store_id,product_id,year,week,units_sold,is_holiday,price,lag_1,sin_woy,cos_woy\n\
                   S001,P001,2024,3,4,0,2.5,3,0.3,0.9\n";
        let table = read_feature_table(csv.as_bytes()).unwrap();
        let point = table.points().next().unwrap();
        assert_eq!(point.lag_52, None);
        assert_eq!(point.lag_1, Some(3.0));
    }

    #[test]
    fn invalid_week_is_rejected() {
        let csv = format!("{}\nS001,P001,2024,60,7,0,9.99,,,,,,,,0,1\n", HEADER);
        assert!(matches!(
            read_feature_table(csv.as_bytes()),
            Err(PlannerError::InvalidParameter(_))
        ));
    }

    #[test]
    fn oversized_year_is_rejected() {
        let csv = format!("{}\nS001,P001,50000000,3,7,0,9.99,,,,,,,,0,1\n", HEADER);
        assert!(matches!(
            read_feature_table(csv.as_bytes()),
            Err(PlannerError::InvalidParameter(_))
        ));
    }

    #[test]
    fn missing_file_is_missing_data() {
        let err = load_feature_table(Path::new("/nonexistent/weekly_features.csv")).unwrap_err();
        assert!(matches!(err, PlannerError::MissingData { artifact: "feature table", .. }));
    }
}
