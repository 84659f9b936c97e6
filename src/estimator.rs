//! 줄 수 추정 모듈
//!
//! 진행률 표시 크기를 정하기 위해 입력 파일의 줄 수를 미리 셉니다.
//! 결과는 근사치이며 변환 결과에는 영향을 주지 않습니다.

use log::debug;
use memmap2::Mmap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ConvertError, Result};

/// 파일의 데이터 행 수 추정 (전체 줄 수 - 헤더 1줄)
///
/// 빈 파일은 `-1`, 헤더만 있는 파일은 `0`을 반환합니다.
///
/// # Arguments
/// * `path` - 입력 CSV 파일 경로
/// * `mmap_threshold` - 이 크기 이상이면 메모리 매핑으로 스캔
pub fn estimate_rows(path: &Path, mmap_threshold: u64) -> Result<i64> {
    let lines = count_lines(path, mmap_threshold)?;
    Ok(lines as i64 - 1)
}

/// 파일의 물리적 줄 수 계산
///
/// `\n`과 `\r\n` 모두 줄 끝으로 인식하며, 마지막 줄에 개행이 없어도 한 줄로 셉니다.
pub fn count_lines(path: &Path, mmap_threshold: u64) -> Result<u64> {
    let file = File::open(path).map_err(|e| ConvertError::FileOpen {
        file: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let file_size = file
        .metadata()
        .map_err(|e| ConvertError::Scan {
            file: path.to_path_buf(),
            reason: e.to_string(),
        })?
        .len();

    if file_size == 0 {
        return Ok(0);
    }

    let lines = if file_size >= mmap_threshold {
        debug!("mmap 스캔: {} ({} bytes)", path.display(), file_size);
        count_with_mmap(path, &file)?
    } else {
        count_with_reader(BufReader::new(file)).map_err(|e| ConvertError::Scan {
            file: path.to_path_buf(),
            reason: e.to_string(),
        })?
    };

    Ok(lines)
}

/// 버퍼 리더로 줄 수 계산
fn count_with_reader<R: BufRead>(mut reader: R) -> std::io::Result<u64> {
    let mut count = 0;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        count += 1;
    }

    Ok(count)
}

/// 메모리 매핑으로 줄 수 계산 (대용량 파일용)
fn count_with_mmap(path: &Path, file: &File) -> Result<u64> {
    let mmap = unsafe {
        Mmap::map(file).map_err(|e| ConvertError::Scan {
            file: path.to_path_buf(),
            reason: format!("메모리 매핑 실패: {}", e),
        })?
    };

    Ok(count_in_slice(&mmap))
}

fn count_in_slice(bytes: &[u8]) -> u64 {
    let newlines = bytes.iter().filter(|&&b| b == b'\n').count() as u64;
    match bytes.last() {
        Some(b'\n') | None => newlines,
        Some(_) => newlines + 1,
    }
}
