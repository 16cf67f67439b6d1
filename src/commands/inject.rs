//! # inject 命令实现
//!
//! 按行改写 VASP 文件，注入新的原子位点。
//!
//! ## 功能
//! - 替换标题行与元素行
//! - 在计数行追加注入位点数
//! - 在文件末尾追加分数坐标行，其余行保持原样
//! - 输出写入带前缀的新文件，原文件不动
//!
//! ## 依赖关系
//! - 使用 `cli/inject.rs` 定义的参数
//! - 使用 `batch/`
//! - 使用 `utils/output.rs`

use crate::batch::{BatchResult, BatchRunner, FileCollector, ProcessResult};
use crate::cli::inject::InjectArgs;
use crate::error::{FpkitError, Result};
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};

/// 默认注入位点：棱心 ¼/¾ 位置、原点与体心
const DEFAULT_SITES: [[f64; 3]; 8] = [
    [0.25, 0.0, 0.5],
    [0.75, 0.0, 0.5],
    [0.5, 0.25, 0.0],
    [0.5, 0.75, 0.0],
    [0.0, 0.5, 0.25],
    [0.0, 0.5, 0.75],
    [0.0, 0.0, 0.0],
    [0.5, 0.5, 0.5],
];

/// 执行 inject 命令
pub fn execute(args: InjectArgs) -> Result<()> {
    output::print_header("Injecting Sites");

    if !args.input.exists() {
        return Err(FpkitError::DirectoryNotFound {
            path: args.input.display().to_string(),
        });
    }

    let sites = match args.sites_file {
        Some(ref path) => parse_sites_file(path)?,
        None => DEFAULT_SITES.to_vec(),
    };

    if sites.is_empty() {
        return Err(FpkitError::InvalidArgument(
            "Sites file contains no sites".to_string(),
        ));
    }

    let files: Vec<PathBuf> = FileCollector::new(args.input.clone())
        .with_pattern(&args.pattern)
        .recursive(args.recursive)
        .collect()
        .into_iter()
        // 已带输出前缀的文件是先前运行的产物，不再作为输入
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| !n.starts_with(&args.prefix))
                .unwrap_or(false)
        })
        .collect();

    if files.is_empty() {
        return Err(FpkitError::NoFilesFound {
            pattern: args.pattern.clone(),
        });
    }

    output::print_info(&format!(
        "Rewriting {} files ({} sites to inject)...",
        files.len(),
        sites.len()
    ));

    let runner = BatchRunner::new(args.jobs);
    let results = runner.run(&files, "Rewriting", |path| {
        process_file(
            path,
            &args.title,
            &args.species,
            &sites,
            &args.prefix,
            args.overwrite,
        )
    });

    let mut tally = BatchResult::default();
    for result in &results {
        match result {
            ProcessResult::Success(from, to) => output::print_rewrite(from, to),
            ProcessResult::Skipped(name) => {
                output::print_skip(&format!("{} (output exists)", name))
            }
            ProcessResult::Failed(name, err) => {
                output::print_warning(&format!("{}: {}", name, err))
            }
        }
        tally.merge(result);
    }

    output::print_success(&format!(
        "{} rewritten, {} skipped, {} failed",
        tally.success, tally.skipped, tally.failed
    ));

    Ok(())
}

/// 处理单个文件
fn process_file(
    path: &Path,
    title: &str,
    species: &str,
    sites: &[[f64; 3]],
    prefix: &str,
    overwrite: bool,
) -> ProcessResult {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    let out_name = format!("{}{}", prefix, filename);
    let out_path = path.with_file_name(&out_name);

    if out_path.exists() && !overwrite {
        return ProcessResult::Skipped(filename);
    }

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return ProcessResult::Failed(filename, e.to_string()),
    };

    let rewritten = match rewrite_content(&content, title, species, sites) {
        Ok(r) => r,
        Err(e) => return ProcessResult::Failed(filename, e.to_string()),
    };

    if let Err(e) = fs::write(&out_path, rewritten) {
        return ProcessResult::Failed(filename, e.to_string());
    }

    ProcessResult::Success(filename, out_name)
}

/// 改写文件内容：标题、元素行、计数行与追加位点
fn rewrite_content(
    content: &str,
    title: &str,
    species: &str,
    sites: &[[f64; 3]],
) -> Result<String> {
    let mut lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();

    if lines.len() < 7 {
        return Err(FpkitError::ParseError {
            format: "poscar".to_string(),
            path: title.to_string(),
            reason: format!("File too short for site injection ({} lines)", lines.len()),
        });
    }

    lines[0] = title.to_string();
    lines[5] = species.to_string();

    let counts = lines[6].trim().to_string();
    lines[6] = format!("{}   {}", counts, sites.len());

    for site in sites {
        lines.push(format!(
            "  {:.9}         {:.9}         {:.9}",
            site[0], site[1], site[2]
        ));
    }

    Ok(lines.join("\n") + "\n")
}

/// 解析位点文件：每行 "x y z"，支持 # 注释与空行
fn parse_sites_file(path: &Path) -> Result<Vec<[f64; 3]>> {
    let content = fs::read_to_string(path).map_err(|e| FpkitError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut sites = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<f64> = line
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();

        if parts.len() < 3 {
            return Err(FpkitError::ParseError {
                format: "sites".to_string(),
                path: path.display().to_string(),
                reason: format!("Expected 'x y z' at line {}", lineno + 1),
            });
        }

        sites.push([parts[0], parts[1], parts[2]]);
    }

    Ok(sites)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SAMPLE: &str = "old title\n1.0\n6.0 0.0 0.0\n0.0 6.0 0.0\n0.0 0.0 6.0\nSn C\n4 4\nDirect\n0.0 0.0 0.0\n0.5 0.5 0.0\n";

    #[test]
    fn test_rewrite_replaces_title_and_species() {
        let result = rewrite_content(SAMPLE, "SnBC", "C B Sn", &DEFAULT_SITES).unwrap();
        let lines: Vec<&str> = result.lines().collect();

        assert_eq!(lines[0], "SnBC");
        assert_eq!(lines[5], "C B Sn");
    }

    #[test]
    fn test_rewrite_appends_site_count() {
        let result = rewrite_content(SAMPLE, "SnBC", "C B Sn", &DEFAULT_SITES).unwrap();
        let lines: Vec<&str> = result.lines().collect();

        assert_eq!(lines[6], "4 4   8");
    }

    #[test]
    fn test_rewrite_appends_sites_at_end() {
        let result = rewrite_content(SAMPLE, "SnBC", "C B Sn", &DEFAULT_SITES).unwrap();
        let lines: Vec<&str> = result.lines().collect();

        // 原 10 行 + 8 个位点
        assert_eq!(lines.len(), 18);
        assert!(lines[10].contains("0.250000000"));
        assert!(lines[17].contains("0.500000000"));
    }

    #[test]
    fn test_rewrite_preserves_untouched_lines() {
        let result = rewrite_content(SAMPLE, "SnBC", "C B Sn", &DEFAULT_SITES).unwrap();
        let lines: Vec<&str> = result.lines().collect();

        assert_eq!(lines[1], "1.0");
        assert_eq!(lines[2], "6.0 0.0 0.0");
        assert_eq!(lines[7], "Direct");
        assert_eq!(lines[8], "0.0 0.0 0.0");
    }

    #[test]
    fn test_rewrite_too_short_is_error() {
        assert!(rewrite_content("a\nb\nc\n", "t", "s", &DEFAULT_SITES).is_err());
    }

    #[test]
    fn test_parse_sites_file_with_comments() {
        let dir = std::env::temp_dir().join("fpkit_inject_sites");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sites.txt");
        fs::write(&path, "# octahedral\n0.25 0.0 0.5\n\n0.5 0.5 0.5\n").unwrap();

        let sites = parse_sites_file(&path).unwrap();
        assert_eq!(sites.len(), 2);
        assert!((sites[0][0] - 0.25).abs() < 1e-12);
        assert!((sites[1][2] - 0.5).abs() < 1e-12);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_parse_sites_file_rejects_short_row() {
        let dir = std::env::temp_dir().join("fpkit_inject_badsites");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sites.txt");
        fs::write(&path, "0.25 0.0\n").unwrap();

        assert!(parse_sites_file(&path).is_err());

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_process_file_skips_existing_output() {
        let dir = std::env::temp_dir().join("fpkit_inject_skip");
        fs::create_dir_all(&dir).unwrap();
        let input = dir.join("s1.vasp");
        fs::write(&input, SAMPLE).unwrap();
        fs::write(dir.join("POSCAR_s1.vasp"), "existing").unwrap();

        let result = process_file(&input, "t", "s", &DEFAULT_SITES, "POSCAR_", false);
        assert!(matches!(result, ProcessResult::Skipped(_)));

        // --overwrite 时重写
        let result = process_file(&input, "t", "s", &DEFAULT_SITES, "POSCAR_", true);
        assert!(matches!(result, ProcessResult::Success(_, _)));

        fs::remove_dir_all(&dir).ok();
    }
}
