//! csv2jsonl - CSV TO JSONL CONVERTER
//!
//! CSV 파일을 행 단위 JSON 객체(JSON Lines)로 변환하는 CLI 도구입니다.
//!
//! # 주요 기능
//!
//! - 🔀 **파이프라인 처리**: CSV 읽기와 JSON 쓰기를 두 스레드에서 동시에 수행
//! - 📊 **진행률 표시**: 미리 센 줄 수를 기준으로 처리 진행 상황 표시
//! - 🔡 **소문자 키**: 헤더 이름을 소문자로 바꿔 JSON 키로 사용
//! - 🧯 **실패 전파**: 한쪽 작업이 실패하면 다른 쪽도 대기 없이 종료
//! - 🎨 **컬러 출력**: 가독성 높은 컬러 터미널 출력
//!
//! # 예제
//!
//! ```bash
//! # 기본 사용법
//! csv2jsonl --file data.csv --output data.jsonl
//!
//! # 한 줄 JSON 출력
//! csv2jsonl -f data.csv -o data.jsonl --compact
//! ```

pub mod cli;
pub mod error;
pub mod estimator;
pub mod logger;
pub mod pipeline;
pub mod producer;
pub mod row;
pub mod stats;
pub mod writer;

// Re-exports for convenient access
pub use cli::Args;
pub use error::{ConvertError, Result};
pub use estimator::{count_lines, estimate_rows};
pub use pipeline::{convert, run_pipeline, ConvertOptions};
pub use producer::{produce_rows, ProduceSummary};
pub use row::{Headers, Row};
pub use stats::{format_bytes, ConversionReport};
pub use writer::{write_output, write_rows, WriteSummary};
