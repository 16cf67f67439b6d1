//! # screen 命令实现
//!
//! 筛查 .vasp 结构并过滤数据集 CSV。
//!
//! ## 功能
//! - 并行解析结构并统计截断半径内的近邻对数
//! - 近邻数超出缓冲区 (natx)、头部与坐标块不一致或无法解析的结构判为 glitchy
//! - 从数据集 CSV 中剔除 glitchy 结构对应的行
//! - 可选的截断半径推荐扫描
//!
//! ## 依赖关系
//! - 使用 `cli/screen.rs` 定义的参数
//! - 使用 `parsers/`, `neighbors/`, `batch/`
//! - 使用 `utils/output.rs`

use crate::batch::{BatchRunner, FileCollector};
use crate::cli::screen::ScreenArgs;
use crate::error::{FpkitError, Result};
use crate::neighbors;
use crate::parsers;
use crate::utils::output;

use std::collections::HashSet;
use std::path::Path;
use tabled::{Table, Tabled};

/// 单个结构的筛查结果
#[derive(Debug, Clone)]
struct ScreenReport {
    /// 结构 ID（文件名去掉扩展名，与数据集 CSV 第一列一致）
    stem: String,
    /// 解析到的原子数
    natoms: usize,
    /// 截断半径内的近邻对数
    neighbor_count: Option<usize>,
    /// 近邻数超出缓冲区
    overflow: bool,
    /// 头部声明与坐标块不一致
    type_mismatch: bool,
    /// 解析失败原因
    parse_error: Option<String>,
}

impl ScreenReport {
    fn is_glitchy(&self) -> bool {
        self.overflow || self.type_mismatch || self.parse_error.is_some()
    }

    fn reason(&self) -> String {
        let mut reasons = Vec::new();
        if self.overflow {
            reasons.push("buffer overflow".to_string());
        }
        if self.type_mismatch {
            reasons.push("type mismatch".to_string());
        }
        if let Some(ref e) = self.parse_error {
            reasons.push(format!("unreadable: {}", e.replace('\n', " ")));
        }
        reasons.join("; ")
    }
}

/// glitchy 结构汇总表行
#[derive(Debug, Tabled)]
struct GlitchRow {
    #[tabled(rename = "Structure")]
    structure: String,
    #[tabled(rename = "Atoms")]
    atoms: String,
    #[tabled(rename = "Neighbors")]
    neighbors: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

/// 截断半径推荐表行
#[derive(Debug, Tabled)]
struct RecommendRow {
    #[tabled(rename = "Structure")]
    structure: String,
    #[tabled(rename = "Formula")]
    formula: String,
    #[tabled(rename = "Atoms")]
    atoms: usize,
    #[tabled(rename = "Cutoff (Å)")]
    cutoff: String,
    #[tabled(rename = "nx")]
    nx: usize,
}

/// 执行 screen 命令
pub fn execute(args: ScreenArgs) -> Result<()> {
    output::print_header("Screening Structures");

    if !args.input.exists() {
        return Err(FpkitError::DirectoryNotFound {
            path: args.input.display().to_string(),
        });
    }

    let files = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)
        .recursive(args.recursive)
        .collect();

    if files.is_empty() {
        return Err(FpkitError::NoFilesFound {
            pattern: args.pattern.clone(),
        });
    }

    if args.recommend {
        return run_recommend(&args, &files);
    }

    output::print_info(&format!(
        "Checking {} structures (cutoff = {} Å, natx = {})...",
        files.len(),
        args.cutoff,
        args.natx
    ));

    let runner = BatchRunner::new(args.jobs);
    let reports = runner.run(&files, "Screening", |path| {
        screen_file(path, args.cutoff, args.natx)
    });

    let glitchy: Vec<&ScreenReport> = reports.iter().filter(|r| r.is_glitchy()).collect();
    let overflow_count = reports.iter().filter(|r| r.overflow).count();

    for report in &glitchy {
        output::print_warning(&format!("{} is glitchy! ({})", report.stem, report.reason()));
    }

    if !glitchy.is_empty() {
        let rows: Vec<GlitchRow> = glitchy
            .iter()
            .map(|r| GlitchRow {
                structure: r.stem.clone(),
                atoms: if r.parse_error.is_some() {
                    "-".to_string()
                } else {
                    r.natoms.to_string()
                },
                neighbors: r
                    .neighbor_count
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                reason: r.reason(),
            })
            .collect();

        output::print_header("Glitchy Structures");
        println!("{}", Table::new(&rows));
    }

    output::print_info(&format!(
        "Structures over the neighbor buffer: {}",
        overflow_count
    ));
    output::print_info(&format!("Total glitchy structures: {}", glitchy.len()));

    // 过滤数据集 CSV
    if args.csv.exists() {
        let glitchy_ids: HashSet<String> = glitchy.iter().map(|r| r.stem.clone()).collect();
        let (kept, removed) = filter_dataset_csv(&args.csv, &args.output, &glitchy_ids)?;
        output::print_success(&format!(
            "Filtered dataset saved to '{}' ({} rows kept, {} removed)",
            args.output.display(),
            kept,
            removed
        ));
    } else {
        output::print_warning(&format!(
            "CSV file '{}' not found, skipping dataset filtering",
            args.csv.display()
        ));
    }

    Ok(())
}

/// 推荐模式：对每个结构扫描截断半径并打印推荐表
fn run_recommend(args: &ScreenArgs, files: &[std::path::PathBuf]) -> Result<()> {
    if args.step <= 0.0 {
        return Err(FpkitError::InvalidArgument(
            "--step must be positive".to_string(),
        ));
    }

    output::print_info(&format!(
        "Sweeping cutoffs {}..{} Å (step {}) over {} structures...",
        args.initial_cutoff,
        args.max_cutoff,
        args.step,
        files.len()
    ));

    let runner = BatchRunner::new(args.jobs);
    let results = runner.run(files, "Sweeping", |path| {
        let stem = file_stem(path);
        match parsers::parse_structure_file(path) {
            Ok(crystal) => {
                let positions = crystal.cart_positions();
                let rec = neighbors::recommend(
                    &crystal.lattice,
                    &positions,
                    args.initial_cutoff,
                    args.max_cutoff,
                    args.step,
                );
                Ok((stem, crystal.formula(), crystal.natoms(), rec))
            }
            Err(e) => Err((stem, e)),
        }
    });

    let mut rows = Vec::new();
    for result in &results {
        match result {
            Ok((stem, formula, natoms, rec)) => rows.push(RecommendRow {
                structure: stem.clone(),
                formula: formula.clone(),
                atoms: *natoms,
                cutoff: format!("{:.1}", rec.cutoff),
                nx: rec.nx,
            }),
            Err((stem, e)) => {
                output::print_warning(&format!("{}: {}", stem, e));
            }
        }
    }

    if rows.is_empty() {
        output::print_warning("No structures could be parsed.");
        return Ok(());
    }

    output::print_header("Recommended Cutoff and Buffer Size");
    println!("{}", Table::new(&rows));

    Ok(())
}

/// 文件名去掉扩展名作为结构 ID
fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// 筛查单个结构文件
fn screen_file(path: &Path, cutoff: f64, natx: usize) -> ScreenReport {
    let stem = file_stem(path);

    match parsers::parse_structure_file(path) {
        Ok(crystal) => {
            let positions = crystal.cart_positions();
            let count = neighbors::count_within_cutoff(&crystal.lattice, &positions, cutoff);

            let types = crystal.species_indices();
            let znucl = crystal.distinct_elements();
            let distinct_types: HashSet<usize> = types.iter().copied().collect();
            let type_mismatch =
                crystal.natoms() != types.len() || distinct_types.len() != znucl.len();

            ScreenReport {
                stem,
                natoms: crystal.natoms(),
                neighbor_count: Some(count),
                overflow: count > natx,
                type_mismatch,
                parse_error: None,
            }
        }
        Err(e) => ScreenReport {
            stem,
            natoms: 0,
            neighbor_count: None,
            overflow: false,
            type_mismatch: false,
            parse_error: Some(e.to_string()),
        },
    }
}

/// 从数据集 CSV 中剔除 glitchy 结构的行，返回 (保留, 剔除) 行数
fn filter_dataset_csv(
    csv_path: &Path,
    output_path: &Path,
    glitchy_ids: &HashSet<String>,
) -> Result<(usize, usize)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(csv_path)
        .map_err(FpkitError::CsvError)?;

    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(output_path)
        .map_err(FpkitError::CsvError)?;

    let mut kept = 0;
    let mut removed = 0;

    for result in rdr.records() {
        let record = result.map_err(FpkitError::CsvError)?;
        let id = record.get(0).unwrap_or("");

        if glitchy_ids.contains(id) {
            removed += 1;
        } else {
            wtr.write_record(&record).map_err(FpkitError::CsvError)?;
            kept += 1;
        }
    }

    wtr.flush().map_err(|e| FpkitError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok((kept, removed))
}
