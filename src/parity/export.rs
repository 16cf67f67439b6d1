//! # 过滤结果导出
//!
//! 将剔除离群点后的预测结果写回无表头 CSV。
//!
//! ## 依赖关系
//! - 被 `commands/parity.rs` 调用
//! - 使用 `models/record.rs` 的 PredictionRecord
//! - 使用 `csv` 库写入

use crate::error::{FpkitError, Result};
use crate::models::PredictionRecord;

use std::path::Path;

/// 导出过滤后的结果，数值保留 15 位小数
pub fn write_filtered_csv(records: &[PredictionRecord], output_path: &Path) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(output_path)
        .map_err(FpkitError::CsvError)?;

    for rec in records {
        wtr.write_record(&[
            rec.structure.clone(),
            format!("{:.15}", rec.true_value),
            format!("{:.15}", rec.predicted_value),
        ])
        .map_err(FpkitError::CsvError)?;
    }

    wtr.flush().map_err(|e| FpkitError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_write_filtered_csv_format() {
        let dir = std::env::temp_dir().join("fpkit_export_test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("filtered.csv");

        let records = vec![
            PredictionRecord {
                structure: "Sn4B2C2-001".to_string(),
                true_value: 3.5,
                predicted_value: 3.25,
            },
            PredictionRecord {
                structure: "Sn4B2C2-002".to_string(),
                true_value: 7.0,
                predicted_value: 6.875,
            },
        ];

        write_filtered_csv(&records, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Sn4B2C2-001,3.5"));
        assert!(lines[0].split(',').nth(1).unwrap().len() > 15);

        fs::remove_dir_all(&dir).ok();
    }
}
