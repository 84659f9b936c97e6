//! 통계 및 유틸리티 모듈
//!
//! 변환 결과 집계와 포맷팅을 담당합니다.

use colored::Colorize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ConvertError, Result};
use crate::producer::ProduceSummary;
use crate::writer::WriteSummary;

/// 한 번의 변환 실행 결과
///
/// 생산자와 작성기의 결과를 각각 보관하며, 어느 쪽이 실패했는지 구분할 수 있습니다.
#[derive(Debug)]
pub struct ConversionReport {
    /// 입력 CSV 경로
    pub input: PathBuf,
    /// 출력 JSONL 경로
    pub output: Option<PathBuf>,
    /// 추정 데이터 행 수
    pub estimated_rows: i64,
    /// 생산자 결과
    pub producer: Result<ProduceSummary>,
    /// 작성기 결과
    pub writer: Result<WriteSummary>,
    /// 파이프라인 실행 시간
    pub elapsed: Duration,
}

impl ConversionReport {
    /// 두 작업 모두 성공했는지 여부
    pub fn is_success(&self) -> bool {
        self.producer.is_ok() && self.writer.is_ok()
    }

    /// 실패의 근본 원인
    ///
    /// 작성기가 먼저 실패해 생산자가 `WriterDisconnected`로 끝난 경우
    /// 작성기 쪽 에러를 돌려줍니다.
    pub fn primary_error(&self) -> Option<&ConvertError> {
        match (&self.producer, &self.writer) {
            (Err(ConvertError::WriterDisconnected { .. }), Err(w)) => Some(w),
            (Err(p), _) => Some(p),
            (Ok(_), Err(w)) => Some(w),
            (Ok(_), Ok(_)) => None,
        }
    }

    /// 근본 원인 이외의 에러 목록
    pub fn secondary_errors(&self) -> Vec<&ConvertError> {
        let primary = self.primary_error();
        [self.producer.as_ref().err(), self.writer.as_ref().err()]
            .into_iter()
            .flatten()
            .filter(|e| !primary.is_some_and(|p| std::ptr::eq(*e, p)))
            .collect()
    }

    /// 생산자가 전송한 행 수 (실패 시 작성기 기준)
    pub fn rows_read(&self) -> u64 {
        match &self.producer {
            Ok(summary) => summary.rows_sent,
            Err(_) => self.rows_written(),
        }
    }

    /// 출력 파일에 기록된 행 수
    pub fn rows_written(&self) -> u64 {
        self.writer.as_ref().map(|s| s.rows_written).unwrap_or(0)
    }

    /// 변환 통계 요약 출력
    pub fn print_summary(&self) {
        let bytes_read = self.producer.as_ref().map(|s| s.bytes_read).unwrap_or(0);
        let bytes_written = self.writer.as_ref().map(|s| s.bytes_written).unwrap_or(0);

        println!("\n{}", "═".repeat(50).bright_blue());
        println!("{}", " 📊 변환 통계".bright_white().bold());
        println!("{}", "═".repeat(50).bright_blue());

        println!(
            "  {} 추정 행 수:   {}",
            "📋".bright_cyan(),
            self.estimated_rows.max(0)
        );
        println!(
            "  {} 읽은 행:      {}",
            "📥".bright_yellow(),
            self.rows_read().to_string().green()
        );
        println!(
            "  {} 기록한 행:    {}",
            "📤".bright_magenta(),
            self.rows_written().to_string().green()
        );

        if let Some(error) = self.primary_error() {
            println!("  {} 실패:         {}", "❌".bright_red(), error.to_string().red());
        } else {
            println!("  {} 실패:         {}", "✅".bright_green(), "0".green());
        }

        println!(
            "  {} 입력 용량:    {}",
            "📥".bright_yellow(),
            format_bytes(bytes_read)
        );
        println!(
            "  {} 출력 용량:    {}",
            "📤".bright_magenta(),
            format_bytes(bytes_written)
        );
        println!(
            "  {} 처리 시간:    {:.2}초",
            "⏱️".bright_cyan(),
            self.elapsed.as_secs_f64()
        );

        println!("{}", "═".repeat(50).bright_blue());
    }
}

/// 바이트를 읽기 쉬운 형식으로 변환
///
/// # Examples
/// ```
/// use csv2jsonl::stats::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1048576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Headers;
    use csv::ByteRecord;

    fn report(producer: Result<ProduceSummary>, writer: Result<WriteSummary>) -> ConversionReport {
        ConversionReport {
            input: PathBuf::from("in.csv"),
            output: Some(PathBuf::from("out.jsonl")),
            estimated_rows: 3,
            producer,
            writer,
            elapsed: Duration::from_millis(5),
        }
    }

    fn produced(rows_sent: u64) -> Result<ProduceSummary> {
        Ok(ProduceSummary {
            headers: Headers::from_record(&ByteRecord::from(vec!["id"])),
            rows_sent,
            bytes_read: 10,
        })
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1073741824), "1.00 GB");
    }

    #[test]
    fn test_success_report() {
        let r = report(
            produced(3),
            Ok(WriteSummary {
                rows_written: 3,
                bytes_written: 30,
            }),
        );

        assert!(r.is_success());
        assert!(r.primary_error().is_none());
        assert!(r.secondary_errors().is_empty());
        assert_eq!(r.rows_read(), 3);
    }

    #[test]
    fn test_writer_error_is_primary() {
        let r = report(
            Err(ConvertError::WriterDisconnected { rows_sent: 1 }),
            Err(ConvertError::Encode {
                rows_written: 1,
                reason: "disk full".to_string(),
            }),
        );

        assert!(matches!(r.primary_error(), Some(ConvertError::Encode { .. })));
        assert_eq!(r.secondary_errors().len(), 1);
        assert!(matches!(
            r.secondary_errors()[0],
            ConvertError::WriterDisconnected { .. }
        ));
    }

    #[test]
    fn test_producer_error_is_primary() {
        let r = report(
            Err(ConvertError::HeaderRead {
                file: PathBuf::from("in.csv"),
                reason: "EOF".to_string(),
            }),
            Ok(WriteSummary::default()),
        );

        assert!(!r.is_success());
        assert!(matches!(r.primary_error(), Some(ConvertError::HeaderRead { .. })));
        assert_eq!(r.rows_read(), 0);
    }
}
