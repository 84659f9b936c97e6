//! CLI 인자 파싱 모듈
//!
//! clap을 사용한 명령줄 인자 정의 및 파싱을 담당합니다.

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::ConvertOptions;

/// csv2jsonl CLI 인자 구조체
#[derive(Parser, Debug)]
#[command(
    name = "csv2jsonl",
    author = "YourName <your@email.com>",
    version,
    about = "CSV TO JSONL CONVERTER - CSV 파일을 JSON Lines로 변환하는 CLI 도구",
    long_about = r#"
CSV TO JSONL CONVERTER
======================

CSV 파일의 첫 줄을 헤더로 읽고, 이후 각 행을
소문자 헤더 이름을 키로 하는 JSON 객체로 변환합니다.

특징:
  • 읽기와 쓰기를 동시에 수행하는 파이프라인
  • 진행률 표시 및 처리 통계
  • 모든 값은 문자열로 유지

예제:
  csv2jsonl --file data.csv --output data.jsonl
  csv2jsonl -f data.csv -o data.jsonl --compact
  csv2jsonl -f data.csv -o data.jsonl --strict-fields --strict
"#
)]
pub struct Args {
    /// 입력 CSV 파일 경로
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// 생성될 JSON 파일 경로
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 한 줄 JSON 출력 (기본값: 2칸 들여쓰기)
    #[arg(long)]
    pub compact: bool,

    /// 헤더와 필드 수가 다른 레코드를 에러로 처리
    #[arg(long)]
    pub strict_fields: bool,

    /// 진행률 바 숨기기
    #[arg(long)]
    pub no_progress: bool,

    /// 변환 중 에러가 있으면 0이 아닌 종료 코드 반환
    #[arg(long)]
    pub strict: bool,

    /// 상세 출력 모드
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// 인자로부터 변환 옵션 생성
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions::new()
            .with_pretty(!self.compact)
            .with_progress(!self.no_progress)
            .with_strict_fields(self.strict_fields)
    }
}
