//! 변환 파이프라인 모듈
//!
//! 줄 수 추정 → (생산자 ∥ 작성기) 순서로 변환을 실행하고,
//! 두 작업 스레드의 결과를 하나의 `ConversionReport`로 모읍니다.

use crossbeam_channel::bounded;
use log::debug;
use std::path::{Path, PathBuf};
use std::thread::{self, ScopedJoinHandle};
use std::time::Instant;

use crate::error::{ConvertError, Result};
use crate::estimator::estimate_rows;
use crate::producer::produce_rows;
use crate::row::Row;
use crate::stats::ConversionReport;
use crate::writer::write_output;

/// 변환 옵션
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// 2칸 들여쓰기 JSON 출력 여부 (false면 한 줄 JSON)
    pub pretty: bool,
    /// 진행률 바 표시 여부
    pub show_progress: bool,
    /// 헤더와 필드 수가 다른 레코드를 에러로 처리
    pub strict_fields: bool,
    /// 줄 수 추정 시 메모리 매핑을 사용할 파일 크기 임계값
    pub mmap_threshold: u64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ConvertOptions {
    /// 기본 옵션 생성
    pub fn new() -> Self {
        Self {
            pretty: true,
            show_progress: true,
            strict_fields: false,
            mmap_threshold: 10 * 1024 * 1024, // 10MB
        }
    }

    /// Pretty 출력 설정
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// 진행률 바 표시 설정
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// 필드 수 엄격 검사 설정
    pub fn with_strict_fields(mut self, strict_fields: bool) -> Self {
        self.strict_fields = strict_fields;
        self
    }

    /// 메모리 매핑 임계값 설정
    pub fn with_mmap_threshold(mut self, mmap_threshold: u64) -> Self {
        self.mmap_threshold = mmap_threshold;
        self
    }
}

/// 줄 수 추정부터 파이프라인 종료까지 한 번에 실행
///
/// 추정 단계의 에러(`FileOpen`, `Scan`)는 파이프라인 시작 전에 바로 반환됩니다.
/// 작업 스레드의 에러는 반환된 리포트 안에 담깁니다.
pub fn convert(
    input: &Path,
    output: Option<&Path>,
    options: &ConvertOptions,
) -> Result<ConversionReport> {
    let estimated_rows = estimate_rows(input, options.mmap_threshold)?;
    Ok(run_pipeline(input, output, estimated_rows, options))
}

/// 생산자와 작성기를 동시에 실행하고 둘 다 끝날 때까지 대기
///
/// 두 스레드는 용량 0 채널(랑데부)로 연결되어 한 번에 한 행만 전달됩니다.
/// 한쪽이 실패하면 채널이 끊어져 다른 쪽도 곧바로 종료됩니다.
pub fn run_pipeline(
    input: &Path,
    output: Option<&Path>,
    estimated_rows: i64,
    options: &ConvertOptions,
) -> ConversionReport {
    let start_time = Instant::now();
    let (tx, rx) = bounded::<Row>(0);

    let (producer, writer) = thread::scope(|s| {
        let producer = s.spawn(move || produce_rows(input, tx, estimated_rows, options));
        let writer = s.spawn(move || write_output(output, rx, options.pretty));

        (join_worker(producer, "producer"), join_worker(writer, "writer"))
    });

    let elapsed = start_time.elapsed();
    debug!("파이프라인 종료: {:?}", elapsed);

    ConversionReport {
        input: input.to_path_buf(),
        output: output.map(PathBuf::from),
        estimated_rows,
        producer,
        writer,
        elapsed,
    }
}

fn join_worker<T>(handle: ScopedJoinHandle<'_, Result<T>>, stage: &'static str) -> Result<T> {
    handle
        .join()
        .unwrap_or_else(|_| Err(ConvertError::WorkerPanicked { stage }))
}
