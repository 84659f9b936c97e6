//! 행 생산자 모듈
//!
//! CSV 파일을 읽어 헤더를 해석하고, 각 데이터 레코드를 `Row`로 만들어
//! 전달 채널로 보냅니다. 진행률 표시는 이 모듈만 소유하고 갱신합니다.

use crossbeam_channel::Sender;
use csv::{ByteRecord, ReaderBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::pipeline::ConvertOptions;
use crate::row::{Headers, Row};

/// 생산자 처리 결과
#[derive(Debug)]
pub struct ProduceSummary {
    /// 해석된 헤더 목록
    pub headers: Headers,
    /// 작성기에 전달한 행 수
    pub rows_sent: u64,
    /// 읽은 입력 바이트 수
    pub bytes_read: u64,
}

/// CSV 파일의 모든 데이터 행을 채널로 전송
///
/// 성공/실패와 관계없이 반환 시 `tx`가 해제되어 채널이 닫히며,
/// 작성기는 이를 스트림의 끝으로 인식합니다.
///
/// # Arguments
/// * `path` - 입력 CSV 파일 경로
/// * `tx` - 전달 채널의 송신측
/// * `estimated_rows` - 진행률 표시에 쓸 추정 행 수
/// * `options` - 변환 옵션
pub fn produce_rows(
    path: &Path,
    tx: Sender<Row>,
    estimated_rows: i64,
    options: &ConvertOptions,
) -> Result<ProduceSummary> {
    let file = File::open(path).map_err(|e| ConvertError::FileOpen {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let pb = create_progress_bar(estimated_rows, options.show_progress);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(!options.strict_fields)
        .from_reader(file);

    let headers = match read_headers(&mut reader, path) {
        Ok(headers) => headers,
        Err(e) => {
            pb.abandon();
            return Err(e);
        }
    };
    debug!("헤더 {}개: {:?}", headers.len(), headers.names());

    let result = send_records(&mut reader, &headers, &tx, &pb, path);
    drop(tx);

    match result {
        Ok(rows_sent) => {
            pb.finish();
            debug!("생산 완료: {}개 행", rows_sent);
            Ok(ProduceSummary {
                headers,
                rows_sent,
                bytes_read: reader.position().byte(),
            })
        }
        Err(e) => {
            pb.abandon();
            Err(e)
        }
    }
}

/// 첫 번째 레코드를 헤더로 읽기
fn read_headers<R: Read>(reader: &mut csv::Reader<R>, path: &Path) -> Result<Headers> {
    let mut record = ByteRecord::new();

    match reader.read_byte_record(&mut record) {
        Ok(true) => Ok(Headers::from_record(&record)),
        Ok(false) => Err(ConvertError::HeaderRead {
            file: path.to_path_buf(),
            reason: "EOF".to_string(),
        }),
        Err(e) => Err(ConvertError::HeaderRead {
            file: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

/// 나머지 레코드를 행으로 변환하여 전송
///
/// 셀은 바이트로 읽으며 잘못된 UTF-8은 에러가 아니라 U+FFFD로 대체됩니다.
/// 읽기 에러가 나면 남은 레코드는 처리하지 않고 즉시 중단합니다.
fn send_records<R: Read>(
    reader: &mut csv::Reader<R>,
    headers: &Headers,
    tx: &Sender<Row>,
    pb: &ProgressBar,
    path: &Path,
) -> Result<u64> {
    let mut record = ByteRecord::new();
    let mut rows_sent = 0;

    loop {
        match reader.read_byte_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                let line = e
                    .position()
                    .map(|p| p.line())
                    .unwrap_or_else(|| reader.position().line());
                return Err(ConvertError::RecordRead {
                    file: path.to_path_buf(),
                    line,
                    reason: e.to_string(),
                });
            }
        }

        let row = Row::from_record(headers, &record);

        // 작성기가 받을 때까지 대기; 수신측이 사라졌으면 에러
        if tx.send(row).is_err() {
            return Err(ConvertError::WriterDisconnected { rows_sent });
        }

        rows_sent += 1;
        pb.inc(1);
    }

    Ok(rows_sent)
}

/// 진행률 바 생성
///
/// 추정치가 음수(빈 파일)이면 길이 0으로 만듭니다.
pub fn create_progress_bar(estimated_rows: i64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(estimated_rows.max(0) as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░");
    pb.set_style(style);
    pb
}
