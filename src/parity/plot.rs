//! # 密度着色散点图
//!
//! 使用 `plotters` 绘制预测值-真实值散点图：
//! 等轴正方形坐标、y = x 对角虚线、按 KDE 密度对数着色的方形散点，
//! 以及右侧密度色条。
//!
//! ## 依赖关系
//! - 被 `commands/parity.rs` 调用
//! - 使用 `parity/kde.rs` 的密度值
//! - 使用 `plotters` 渲染图表

use crate::error::{FpkitError, Result};

use plotters::prelude::*;
use std::path::Path;

/// 散点图中的一个点
#[derive(Debug, Clone, Copy)]
pub struct ParityPoint {
    /// 真实值（横轴）
    pub x: f64,
    /// 预测值（纵轴）
    pub y: f64,
    /// KDE 密度（已乘样本数）
    pub density: f64,
}

/// 黑-红-黄色图，t ∈ [0, 1]
pub fn density_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        let s = t * 2.0;
        RGBColor((255.0 * s).round() as u8, 0, 0)
    } else {
        let s = (t - 0.5) * 2.0;
        RGBColor(255, (255.0 * s).round() as u8, 0)
    }
}

/// 密度在对数刻度上的归一化位置
fn log_norm(z: f64, z_min: f64, z_max: f64) -> f64 {
    if z_max <= z_min {
        return 1.0;
    }
    (z.ln() - z_min.ln()) / (z_max.ln() - z_min.ln())
}

/// 色条刻度标签格式
fn format_density(v: f64) -> String {
    if v >= 100.0 {
        format!("{:.0}", v)
    } else if v >= 1.0 {
        format!("{:.1}", v)
    } else {
        format!("{:.3}", v)
    }
}

/// 生成密度着色散点图 (PNG + SVG)
#[allow(clippy::too_many_arguments)]
pub fn generate_parity_plot(
    points: &[ParityPoint],
    title: &str,
    x_label: &str,
    y_label: &str,
    png_path: &Path,
    svg_path: &Path,
    width: u32,
    height: u32,
) -> Result<()> {
    {
        let root = BitMapBackend::new(png_path, (width, height)).into_drawing_area();
        draw_parity_chart(&root, points, title, x_label, y_label, width, height)?;
        root.present()
            .map_err(|e| FpkitError::PlotError(e.to_string()))?;
    }
    {
        let root = SVGBackend::new(svg_path, (width, height)).into_drawing_area();
        draw_parity_chart(&root, points, title, x_label, y_label, width, height)?;
        root.present()
            .map_err(|e| FpkitError::PlotError(e.to_string()))?;
    }
    Ok(())
}

/// 绘制散点图核心逻辑
fn draw_parity_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    points: &[ParityPoint],
    title: &str,
    x_label: &str,
    y_label: &str,
    width: u32,
    height: u32,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| FpkitError::PlotError(format!("{:?}", e)))?;

    // 右侧留给色条
    let cbar_width = 110;
    let (chart_area, cbar_area) = root.split_horizontally(width as i32 - cbar_width);

    // 横纵轴共用范围：[min - 1, max + 1]
    let data_min = points
        .iter()
        .flat_map(|p| [p.x, p.y])
        .fold(f64::INFINITY, f64::min);
    let data_max = points
        .iter()
        .flat_map(|p| [p.x, p.y])
        .fold(f64::NEG_INFINITY, f64::max);
    let min_val = data_min - 1.0;
    let max_val = data_max + 1.0;

    let mut chart = ChartBuilder::on(&chart_area)
        .caption(title, ("sans-serif", 28).into_font())
        .margin(30)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(min_val..max_val, min_val..max_val)
        .map_err(|e| FpkitError::PlotError(format!("{:?}", e)))?;

    // 整数刻度，间隔 2
    let tick_count = (((max_val - min_val) / 2.0).round() as usize).max(2);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(tick_count)
        .y_labels(tick_count)
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| format!("{:.0}", v))
        .x_desc(x_label)
        .y_desc(y_label)
        .x_label_style(("sans-serif", 18))
        .y_label_style(("sans-serif", 18))
        .axis_desc_style(("sans-serif", 20))
        .draw()
        .map_err(|e| FpkitError::PlotError(format!("{:?}", e)))?;

    // y = x 对角虚线
    let n_dash = 60;
    let dashes: Vec<PathElement<(f64, f64)>> = (0..n_dash)
        .step_by(2)
        .map(|k| {
            let t0 = k as f64 / n_dash as f64;
            let t1 = (k + 1) as f64 / n_dash as f64;
            PathElement::new(
                vec![
                    (min_val + t0 * (max_val - min_val), min_val + t0 * (max_val - min_val)),
                    (min_val + t1 * (max_val - min_val), min_val + t1 * (max_val - min_val)),
                ],
                BLACK.stroke_width(1),
            )
        })
        .collect();
    chart
        .draw_series(dashes)
        .map_err(|e| FpkitError::PlotError(format!("{:?}", e)))?;

    // 密度对数归一化范围
    let z_min = points
        .iter()
        .map(|p| p.density)
        .fold(f64::INFINITY, f64::min);
    let z_max = points
        .iter()
        .map(|p| p.density)
        .fold(f64::NEG_INFINITY, f64::max);

    // 方形散点，调用方已按密度升序排序，密集区后绘制
    chart
        .draw_series(points.iter().map(|p| {
            let color = density_color(log_norm(p.density, z_min, z_max));
            EmptyElement::at((p.x, p.y)) + Rectangle::new([(-2, -2), (2, 2)], color.filled())
        }))
        .map_err(|e| FpkitError::PlotError(format!("{:?}", e)))?;

    draw_colorbar(&cbar_area, z_min, z_max, height)?;

    Ok(())
}

/// 绘制右侧密度色条
fn draw_colorbar<DB: DrawingBackend>(
    area: &DrawingArea<DB, plotters::coord::Shift>,
    z_min: f64,
    z_max: f64,
    height: u32,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    let top = 60;
    let bottom = height as i32 - 90;
    let bar_x0 = 10;
    let bar_x1 = 34;
    let bar_h = bottom - top;

    let steps = 100;
    for i in 0..steps {
        // 自上而下从最大密度到最小密度
        let t = 1.0 - i as f64 / (steps - 1) as f64;
        let y0 = top + i * bar_h / steps;
        let y1 = top + (i + 1) * bar_h / steps;
        area.draw(&Rectangle::new(
            [(bar_x0, y0), (bar_x1, y1)],
            density_color(t).filled(),
        ))
        .map_err(|e| FpkitError::PlotError(format!("{:?}", e)))?;
    }

    area.draw(&Rectangle::new(
        [(bar_x0, top), (bar_x1, bottom)],
        BLACK.stroke_width(1),
    ))
    .map_err(|e| FpkitError::PlotError(format!("{:?}", e)))?;

    let label_style = ("sans-serif", 16).into_font().color(&BLACK);
    area.draw(&Text::new(
        format_density(z_max),
        (bar_x1 + 6, top - 8),
        label_style.clone(),
    ))
    .map_err(|e| FpkitError::PlotError(format!("{:?}", e)))?;
    area.draw(&Text::new(
        format_density(z_min),
        (bar_x1 + 6, bottom - 8),
        label_style,
    ))
    .map_err(|e| FpkitError::PlotError(format!("{:?}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_color_endpoints() {
        let black = density_color(0.0);
        assert_eq!((black.0, black.1, black.2), (0, 0, 0));

        let red = density_color(0.5);
        assert_eq!((red.0, red.1, red.2), (255, 0, 0));

        let yellow = density_color(1.0);
        assert_eq!((yellow.0, yellow.1, yellow.2), (255, 255, 0));
    }

    #[test]
    fn test_density_color_clamps() {
        let low = density_color(-3.0);
        assert_eq!((low.0, low.1, low.2), (0, 0, 0));

        let high = density_color(7.0);
        assert_eq!((high.0, high.1, high.2), (255, 255, 0));
    }

    #[test]
    fn test_log_norm_bounds() {
        assert!((log_norm(1.0, 1.0, 100.0) - 0.0).abs() < 1e-12);
        assert!((log_norm(100.0, 1.0, 100.0) - 1.0).abs() < 1e-12);
        assert!((log_norm(10.0, 1.0, 100.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_log_norm_degenerate_range() {
        assert!((log_norm(5.0, 5.0, 5.0) - 1.0).abs() < 1e-12);
    }
}
