//! 에러 타입 정의 모듈
//!
//! csv2jsonl 변환 과정에서 발생할 수 있는 모든 에러 타입을 정의합니다.

use std::path::PathBuf;
use thiserror::Error;

/// csv2jsonl에서 발생할 수 있는 에러 타입
#[derive(Error, Debug)]
pub enum ConvertError {
    /// 입력 파일 열기 실패
    #[error("파일을 열 수 없습니다 ({file}): {reason}")]
    FileOpen { file: PathBuf, reason: String },

    /// 줄 수 추정 중 읽기 실패
    #[error("줄 수 계산 실패 ({file}): {reason}")]
    Scan { file: PathBuf, reason: String },

    /// CSV 헤더 읽기 실패
    #[error("CSV 헤더를 읽을 수 없습니다 ({file}): {reason}")]
    HeaderRead { file: PathBuf, reason: String },

    /// CSV 레코드 읽기 실패
    #[error("CSV 레코드 읽기 실패 ({file}, {line}번째 줄): {reason}")]
    RecordRead {
        file: PathBuf,
        line: u64,
        reason: String,
    },

    /// 출력 파일 생성 실패
    #[error("출력 파일을 생성할 수 없습니다 ({path}): {reason}")]
    OutputCreate { path: PathBuf, reason: String },

    /// JSON 직렬화 또는 쓰기 실패
    #[error("JSON 쓰기 실패 ({rows_written}개 행 기록 후): {reason}")]
    Encode { rows_written: u64, reason: String },

    /// 작성기가 먼저 종료되어 행을 넘길 수 없음
    #[error("레코드 작성기가 종료되어 전송을 중단했습니다 ({rows_sent}개 행 전송 후)")]
    WriterDisconnected { rows_sent: u64 },

    /// 작업 스레드 패닉
    #[error("{stage} 스레드가 비정상 종료되었습니다")]
    WorkerPanicked { stage: &'static str },
}

/// csv2jsonl 결과 타입 별칭
pub type Result<T> = std::result::Result<T, ConvertError>;
