//! 행 데이터 모델
//!
//! CSV 헤더 목록과, 헤더 이름을 키로 하는 행(`Row`)을 정의합니다.

use csv::ByteRecord;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

const UTF8_BOM: char = '\u{feff}';

/// 소문자로 변환된 CSV 헤더 목록
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headers {
    names: Vec<String>,
}

impl Headers {
    /// 첫 번째 CSV 레코드로부터 헤더 목록 생성
    ///
    /// 각 필드는 소문자로 변환되며, 첫 필드 앞의 UTF-8 BOM은 제거됩니다.
    /// 유효하지 않은 UTF-8 바이트는 U+FFFD로 바뀝니다.
    ///
    /// # Examples
    /// ```
    /// use csv::ByteRecord;
    /// use csv2jsonl::row::Headers;
    ///
    /// let headers = Headers::from_record(&ByteRecord::from(vec!["Name", "AGE"]));
    /// assert_eq!(headers.names(), &["name".to_string(), "age".to_string()]);
    /// ```
    pub fn from_record(record: &ByteRecord) -> Self {
        let names = record
            .iter()
            .map(decode_field)
            .enumerate()
            .map(|(i, field)| {
                let field: &str = &field;
                let field = if i == 0 {
                    field.trim_start_matches(UTF8_BOM)
                } else {
                    field
                };
                field.to_lowercase()
            })
            .collect();

        Self { names }
    }

    /// 헤더 이름 목록
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// 헤더 이름 → 셀 값 매핑으로 표현된 CSV 데이터 한 줄
///
/// 키는 정렬된 순서로 직렬화되므로 같은 입력은 항상 같은 출력을 만듭니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(BTreeMap<String, String>);

impl Row {
    /// 헤더와 레코드를 위치 기준으로 짝지어 행 생성
    ///
    /// 필드 수가 헤더 수와 다르면 짧은 쪽 길이까지만 포함됩니다.
    /// 중복된 헤더는 뒤쪽 열의 값이 남습니다.
    pub fn from_record(headers: &Headers, record: &ByteRecord) -> Self {
        let map = headers
            .names()
            .iter()
            .zip(record.iter())
            .map(|(key, value)| (key.clone(), decode_field(value).into_owned()))
            .collect();

        Self(map)
    }

    /// 키로 셀 값 조회
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 헤더 순서대로 셀 값을 다시 나열 (없는 키는 건너뜀)
    pub fn flatten<'a>(&'a self, headers: &'a Headers) -> Vec<&'a str> {
        headers
            .names()
            .iter()
            .filter_map(|name| self.get(name))
            .collect()
    }
}

/// 셀 바이트를 문자열로 변환 (잘못된 UTF-8은 U+FFFD로 대체)
fn decode_field(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}
