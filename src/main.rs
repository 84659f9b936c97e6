//! csv2jsonl - CSV TO JSONL CONVERTER
//!
//! 메인 엔트리포인트

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use log::{error, warn};
use std::path::Path;
use std::time::Instant;

use csv2jsonl::{
    cli::Args, estimator::estimate_rows, logger::setup_logging, pipeline::run_pipeline,
};

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let Some(file) = args.file.as_deref() else {
        println!("Please provide a file path using the --file argument.");
        return Ok(());
    };

    let start_time = Instant::now();
    let options = args.convert_options();

    print_header(&args, file);

    println!("Reading file...");
    println!("=================");

    let estimated_rows = match estimate_rows(file, options.mmap_threshold) {
        Ok(n) => n,
        Err(e) => {
            error!("Error evaluating total lines: {}", e);
            if args.strict {
                anyhow::bail!(e);
            }
            return Ok(());
        }
    };

    println!("Estimated total lines: {}", estimated_rows);

    let report = run_pipeline(file, args.output.as_deref(), estimated_rows, &options);

    if let Some(e) = report.primary_error() {
        error!("{}", e);
    }
    for e in report.secondary_errors() {
        warn!("{}", e);
    }

    println!("{}", "Conversion complete!".bright_green());
    println!("File name: {}", file.display());
    println!(
        "Processing time: {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    report.print_summary();

    if args.strict {
        if let Some(e) = report.primary_error() {
            anyhow::bail!("변환 실패: {}", e);
        }
    }

    Ok(())
}

/// 헤더 출력
fn print_header(args: &Args, file: &Path) {
    println!("\n{}", "═".repeat(50).bright_blue());
    println!("{}", " 🚀 CSV TO JSONL CONVERTER".bright_white().bold());
    println!("{}", "═".repeat(50).bright_blue());
    println!("  {} 입력 파일: {:?}", "📂".bright_cyan(), file);

    match args.output {
        Some(ref output) => println!("  {} 출력 파일: {:?}", "📄".bright_green(), output),
        None => println!(
            "  {} {}",
            "⚠️".bright_yellow(),
            "출력 파일이 지정되지 않았습니다 (--output)".yellow()
        ),
    }

    if args.compact {
        println!("  {} {}", "📏".bright_white(), "한 줄 JSON 출력 모드".white());
    }

    if args.strict_fields {
        println!(
            "  {} {}",
            "🎯".bright_magenta(),
            "필드 수 엄격 검사".magenta()
        );
    }

    println!("{}", "═".repeat(50).bright_blue());
}
