//! 레코드 작성기 모듈
//!
//! 전달 채널에서 받은 행을 JSON 객체로 직렬화하여 한 줄씩 출력 파일에 씁니다.

use crossbeam_channel::Receiver;
use log::debug;
use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter, PrettyFormatter, Serializer};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::row::Row;

/// 작성기 처리 결과
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    /// 기록한 행 수
    pub rows_written: u64,
    /// 기록한 바이트 수 (개행 포함)
    pub bytes_written: u64,
}

/// 출력 파일을 새로 만들고 채널이 닫힐 때까지 모든 행을 기록
///
/// 출력 경로가 없거나 파일을 만들 수 없으면 `OutputCreate` 에러를 반환합니다.
/// 어떤 경우든 반환 시 `rx`가 해제되므로 생산자는 대기 상태에 머물지 않습니다.
pub fn write_output(path: Option<&Path>, rx: Receiver<Row>, pretty: bool) -> Result<WriteSummary> {
    let path = match path {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => {
            return Err(ConvertError::OutputCreate {
                path: PathBuf::new(),
                reason: "출력 경로가 지정되지 않았습니다".to_string(),
            })
        }
    };

    let file = File::create(path).map_err(|e| ConvertError::OutputCreate {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let summary = write_rows(BufWriter::new(file), rx, pretty)?;
    debug!(
        "작성 완료: {} ({}개 행)",
        path.display(),
        summary.rows_written
    );
    Ok(summary)
}

/// 임의의 출력 대상에 행을 JSON 한 개씩 기록
///
/// # Arguments
/// * `sink` - 출력 대상
/// * `rx` - 전달 채널의 수신측
/// * `pretty` - 2칸 들여쓰기 여부 (false면 한 줄 JSON)
pub fn write_rows<W: Write>(mut sink: W, rx: Receiver<Row>, pretty: bool) -> Result<WriteSummary> {
    let mut summary = WriteSummary::default();

    for row in rx.iter() {
        let json = encode_row(&row, pretty).map_err(|e| ConvertError::Encode {
            rows_written: summary.rows_written,
            reason: e.to_string(),
        })?;

        sink.write_all(&json)
            .and_then(|_| sink.write_all(b"\n"))
            .map_err(|e| ConvertError::Encode {
                rows_written: summary.rows_written,
                reason: e.to_string(),
            })?;

        summary.rows_written += 1;
        summary.bytes_written += json.len() as u64 + 1;
    }

    sink.flush().map_err(|e| ConvertError::Encode {
        rows_written: summary.rows_written,
        reason: e.to_string(),
    })?;

    Ok(summary)
}

/// 행 하나를 JSON 바이트로 직렬화
fn encode_row(row: &Row, pretty: bool) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(128);

    if pretty {
        let formatter = HtmlSafeFormatter(PrettyFormatter::new());
        row.serialize(&mut Serializer::with_formatter(&mut buf, formatter))?;
    } else {
        let formatter = HtmlSafeFormatter(CompactFormatter);
        row.serialize(&mut Serializer::with_formatter(&mut buf, formatter))?;
    }

    Ok(buf)
}

/// `<`, `>`, `&`, U+2028, U+2029를 `\uXXXX`로 이스케이프하는 포매터
///
/// 구조(들여쓰기, 구분자)는 감싼 포매터에 그대로 맡깁니다.
struct HtmlSafeFormatter<F>(F);

impl<F: Formatter> Formatter for HtmlSafeFormatter<F> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn end_object_key<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_key(writer)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;

        for (i, ch) in fragment.char_indices() {
            let escaped = match ch {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..i].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;
            start = i + ch.len_utf8();
        }

        writer.write_all(fragment[start..].as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Headers;
    use crossbeam_channel::bounded;
    use csv::ByteRecord;
    use std::thread;

    fn row(pairs: &[(&str, &str)]) -> Row {
        let headers = Headers::from_record(&ByteRecord::from(
            pairs.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
        ));
        let values = ByteRecord::from(pairs.iter().map(|(_, v)| *v).collect::<Vec<_>>());
        Row::from_record(&headers, &values)
    }

    /// 지정한 바이트 수를 넘기면 쓰기에 실패하는 출력 대상
    struct FailingSink {
        written: usize,
        limit: usize,
    }

    impl Write for FailingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written + buf.len() > self.limit {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            self.written += buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_rows_compact() {
        let (tx, rx) = bounded::<Row>(1);
        tx.send(row(&[("name", "Alice"), ("age", "30")])).unwrap();
        drop(tx);

        let mut out = Vec::new();
        let summary = write_rows(&mut out, rx, false).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"age\":\"30\",\"name\":\"Alice\"}\n"
        );
        assert_eq!(summary.rows_written, 1);
        assert_eq!(summary.bytes_written, 28);
    }

    #[test]
    fn test_write_rows_pretty_uses_two_spaces() {
        let (tx, rx) = bounded::<Row>(1);
        tx.send(row(&[("id", "7")])).unwrap();
        drop(tx);

        let mut out = Vec::new();
        write_rows(&mut out, rx, true).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "{\n  \"id\": \"7\"\n}\n");
    }

    #[test]
    fn test_html_sensitive_characters_are_escaped() {
        let (tx, rx) = bounded::<Row>(1);
        tx.send(row(&[("html", "<b>a&b</b>\u{2028}\u{2029}"), ("q", "\"x\"")]))
            .unwrap();
        drop(tx);

        let mut out = Vec::new();
        write_rows(&mut out, rx, false).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"html\":\"\\u003cb\\u003ea\\u0026b\\u003c/b\\u003e\\u2028\\u2029\",\"q\":\"\\\"x\\\"\"}\n"
        );
    }

    #[test]
    fn test_escaped_output_parses_back() {
        let (tx, rx) = bounded::<Row>(1);
        tx.send(row(&[("k", "x < y && y > z")])).unwrap();
        drop(tx);

        let mut out = Vec::new();
        write_rows(&mut out, rx, true).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["k"], "x < y && y > z");
        assert!(String::from_utf8(out).unwrap().starts_with("{\n  \"k\": "));
    }

    #[test]
    fn test_missing_output_path() {
        let (_tx, rx) = bounded::<Row>(0);

        let err = write_output(None, rx, true).unwrap_err();
        assert!(matches!(err, ConvertError::OutputCreate { .. }));
    }

    #[test]
    fn test_write_failure_releases_sender() {
        let (tx, rx) = bounded::<Row>(0);

        let sender = thread::spawn(move || {
            let mut sent = 0;
            for i in 0..100 {
                let value = i.to_string();
                if tx.send(row(&[("n", value.as_str())])).is_err() {
                    break;
                }
                sent += 1;
            }
            sent
        });

        // 행 하나는 `{"n":"0"}` + 개행 = 10바이트
        let sink = FailingSink {
            written: 0,
            limit: 25,
        };
        let err = write_rows(sink, rx, false).unwrap_err();
        let sent = sender.join().unwrap();

        assert!(matches!(err, ConvertError::Encode { rows_written: 2, .. }));
        assert!(sent < 100);
    }
}
