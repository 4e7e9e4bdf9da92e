//! 버전 마커 검증 및 비교.
//!
//! 원격 마커는 `MAJOR.MINOR.PATCH` 뒤에 임의 접미사를 허용한다.
//! 비교는 `.` 단위 정수 비교이며 부족한 세그먼트는 0으로 본다
//! (`1.2 == 1.2.0`, `1.3 > 1.2.9`).

use std::cmp::Ordering;

/// 마커 문자열이 `숫자.숫자.숫자`로 시작하는지
pub fn is_valid_version_marker(text: &str) -> bool {
    let mut rest = text;
    for index in 0..3 {
        let digits = rest.chars().take_while(char::is_ascii_digit).count();
        if digits == 0 {
            return false;
        }
        rest = &rest[digits..];
        if index < 2 {
            match rest.strip_prefix('.') {
                Some(tail) => rest = tail,
                None => return false,
            }
        }
    }
    true
}

/// 세그먼트 정수 값: 앞쪽 숫자만 읽고, 숫자가 없으면 0
///
/// `u64` 범위를 넘는 숫자는 `u64::MAX`로 포화시킨다.
fn segment_value(segment: &str) -> u64 {
    let digits: String = segment
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    if digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(u64::MAX)
}

/// 두 버전 비교
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left: Vec<u64> = a.split('.').map(segment_value).collect();
    let right: Vec<u64> = b.split('.').map(segment_value).collect();

    for i in 0..left.len().max(right.len()) {
        let l = left.get(i).copied().unwrap_or(0);
        let r = right.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_equal_versions() {
        assert_eq!(compare_versions("1.2.3", "1.2.3"), Ordering::Equal);
        assert_eq!(compare_versions("1.2", "1.2.0"), Ordering::Equal);
        assert_eq!(compare_versions("1.2.0.0", "1.2"), Ordering::Equal);
    }

    #[test]
    fn compare_ordering() {
        assert_eq!(compare_versions("1.3.0", "1.2.9"), Ordering::Greater);
        assert_eq!(compare_versions("1.3", "1.2.9"), Ordering::Greater);
        assert_eq!(compare_versions("2.0.0", "1.9.9"), Ordering::Greater);
        assert_eq!(compare_versions("1.9.9", "2.0.0"), Ordering::Less);
        assert_eq!(compare_versions("1.10.0", "1.9.0"), Ordering::Greater);
    }

    #[test]
    fn compare_tolerates_suffixes() {
        assert_eq!(compare_versions("1.2.3-beta", "1.2.3"), Ordering::Equal);
        assert_eq!(compare_versions("1.2.x", "1.2.0"), Ordering::Equal);
    }

    #[test]
    fn oversized_segment_saturates() {
        assert_eq!(
            compare_versions("1.99999999999999999999.0", "1.5.0"),
            Ordering::Greater
        );
        assert_eq!(
            compare_versions("1.5.0", "1.99999999999999999999.0"),
            Ordering::Less
        );
        assert_eq!(
            compare_versions("99999999999999999999", "18446744073709551615"),
            Ordering::Equal
        );
    }

    #[test]
    fn marker_validation() {
        assert!(is_valid_version_marker("1.2.3"));
        assert!(is_valid_version_marker("10.20.30-rc1"));
        assert!(!is_valid_version_marker("1.2"));
        assert!(!is_valid_version_marker("v1.2.3"));
        assert!(!is_valid_version_marker("<!DOCTYPE html>"));
        assert!(!is_valid_version_marker(""));
        assert!(!is_valid_version_marker("1..3"));
    }
}
