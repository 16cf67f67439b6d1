//! # parity 命令实现
//!
//! 读取预测结果 CSV，剔除离群点，绘制密度着色散点图。
//!
//! ## 功能
//! - 按残差标准差的倍数过滤离群点
//! - 计算过滤后的平均绝对误差 (MAE)
//! - KDE 密度着色的预测值-真实值散点图 (PNG + SVG)
//! - 导出过滤后的结果 CSV
//!
//! ## 依赖关系
//! - 使用 `cli/parity.rs` 定义的参数
//! - 使用 `models/record.rs`, `parity/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::parity::ParityArgs;
use crate::error::{FpkitError, Result};
use crate::models::PredictionRecord;
use crate::parity::{export, kde, plot, stats, ParityPoint};
use crate::utils::{output, progress};

use std::path::Path;

/// 执行 parity 命令
pub fn execute(args: ParityArgs) -> Result<()> {
    output::print_header("Parity Analysis");

    if !args.input.exists() {
        return Err(FpkitError::FileNotFound {
            path: args.input.display().to_string(),
        });
    }

    let records = read_results_csv(&args.input)?;
    if records.is_empty() {
        return Err(FpkitError::Other(format!(
            "No records in '{}'",
            args.input.display()
        )));
    }

    output::print_info(&format!(
        "Loaded {} predictions from '{}'",
        records.len(),
        args.input.display()
    ));

    // 离群点过滤
    let residuals: Vec<f64> = records.iter().map(|r| r.residual()).collect();
    let (threshold, mask) = stats::outlier_mask(&residuals, args.sigma);

    let filtered: Vec<PredictionRecord> = records
        .iter()
        .zip(mask.iter())
        .filter(|(_, &keep)| keep)
        .map(|(r, _)| r.clone())
        .collect();
    let removed = records.len() - filtered.len();

    output::print_info(&format!(
        "Outlier threshold {:.6} ({} σ): {} kept, {} removed",
        threshold,
        args.sigma,
        filtered.len(),
        removed
    ));

    if filtered.len() < 2 {
        return Err(FpkitError::Other(
            "Not enough data after outlier filtering to estimate density".to_string(),
        ));
    }

    let filtered_residuals: Vec<f64> = filtered.iter().map(|r| r.residual()).collect();
    let mae = stats::mean_absolute_error(&filtered_residuals);

    // KDE 密度着色
    let xs: Vec<f64> = filtered.iter().map(|r| r.true_value).collect();
    let ys: Vec<f64> = filtered.iter().map(|r| r.predicted_value).collect();

    let spinner = progress::create_spinner("Estimating point density...");
    let density = kde::evaluate_at_samples(&xs, &ys)?;
    spinner.finish_and_clear();

    // 密度乘样本数，色条读数即近似的数据点数
    let n = xs.len() as f64;
    let mut points: Vec<ParityPoint> = xs
        .iter()
        .zip(ys.iter())
        .zip(density.iter())
        .map(|((&x, &y), &z)| ParityPoint {
            x,
            y,
            density: z * n,
        })
        .collect();

    // 密度升序排序，密集区最后绘制
    points.sort_by(|a, b| {
        a.density
            .partial_cmp(&b.density)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let title = args
        .title
        .clone()
        .unwrap_or_else(|| format!("MAE: {:.3}", mae));

    let png_path = args.output.with_extension("png");
    let svg_path = args.output.with_extension("svg");

    plot::generate_parity_plot(
        &points,
        &title,
        &args.xlabel,
        &args.ylabel,
        &png_path,
        &svg_path,
        args.width,
        args.height,
    )?;

    output::print_success(&format!(
        "Parity plot saved to '{}' and '{}'",
        png_path.display(),
        svg_path.display()
    ));

    export::write_filtered_csv(&filtered, &args.filtered_output)?;
    output::print_success(&format!(
        "Filtered results saved to '{}'",
        args.filtered_output.display()
    ));

    output::print_info(&format!("MAE after filtering: {:.6}", mae));

    Ok(())
}

/// 读取无表头的预测结果 CSV
fn read_results_csv(path: &Path) -> Result<Vec<PredictionRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(FpkitError::CsvError)?;

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: PredictionRecord = result.map_err(FpkitError::CsvError)?;
        records.push(record);
    }

    Ok(records)
}
