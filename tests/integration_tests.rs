//! Integration tests for srtsync
//!
//! These tests exercise the codec, the resynchronizer and the file pipeline
//! together against real files in temporary directories.

use srtsync::config::{Config, TextEncoding};
use srtsync::pipeline::{resynchronize_file, resynchronize_file_with, ResyncConfig};
use srtsync::subtitle::timestamp::{difference, format, parse, shift};
use srtsync::subtitle::{
    difference_between, is_timing_line, resynchronize, resynchronize_with, ShiftPolicy,
    SubtitleDocument,
};
use srtsync::SrtSyncError;

use std::fs;
use tempfile::TempDir;

const SAMPLE_SRT: &str = "1
00:00:01,000 --> 00:00:02,000
Hello

2
00:01:59,456 --> 00:02:02,129
Second line
with two rows

3
00:02:10,000 --> 00:02:12,500
- 00:00:00,000 --> 00:00:01,000 is not a cue
";

// ============================================================================
// Codec Tests
// ============================================================================

mod codec_tests {
    use super::*;

    #[test]
    fn test_reference_values() {
        assert_eq!(parse("11:38:35,899").unwrap(), 41915899);
        assert_eq!(format(60000), "00:01:00,000");
        assert_eq!(shift("01:15:30,200", 300300).unwrap(), "01:20:30,500");
        assert_eq!(difference(41915899, 41315899), 600000);
        assert_eq!(
            difference_between("11:38:35,899", "11:28:35,899").unwrap(),
            600000
        );
    }

    #[test]
    fn test_classification() {
        assert!(is_timing_line("00:01:59,456 --> 00:02:02,129"));
        assert!(!is_timing_line("0:01:59,456 --> 00:02:02,129"));
        assert!(!is_timing_line("00:01:59,456-->00:02:02,129"));
    }

    #[test]
    fn test_every_millisecond_of_a_minute_round_trips() {
        for ms in (0..60_000).step_by(7) {
            let text = format(ms);
            assert_eq!(parse(&text).unwrap(), ms);
        }
    }
}

// ============================================================================
// Resynchronizer Tests
// ============================================================================

mod resync_tests {
    use super::*;

    #[test]
    fn test_scenario_single_block() {
        let doc = SubtitleDocument::from_lines(
            ["1", "00:00:01,000 --> 00:00:02,000", "Hello", ""],
            "Test.srt",
            TextEncoding::utf_8(),
        );
        let shifted = resynchronize(&doc, 1000);
        assert_eq!(
            shifted.lines(),
            ["1", "00:00:02,000 --> 00:00:03,000", "Hello", ""]
        );
    }

    #[test]
    fn test_empty_document_unchanged() {
        let doc = SubtitleDocument::from_text("");
        assert_eq!(*resynchronize(&doc, 5000), doc);
        assert_eq!(*resynchronize(&doc, -5000), doc);
    }

    #[test]
    fn test_sample_invariants() {
        let doc = SubtitleDocument::from_text(SAMPLE_SRT);
        for offset in [-1000, -1, 1, 2500, 3_600_000] {
            let shifted = resynchronize(&doc, offset);
            assert_eq!(shifted.line_count(), doc.line_count());
            for (before, after) in doc.lines().iter().zip(shifted.lines()) {
                if is_timing_line(before) {
                    assert!(is_timing_line(after));
                } else {
                    assert_eq!(before, after);
                }
            }
        }
    }

    #[test]
    fn test_sample_shift_text() {
        let doc = SubtitleDocument::from_text(SAMPLE_SRT);
        let shifted = resynchronize(&doc, 2500).to_text();

        assert!(shifted.contains("00:00:03,500 --> 00:00:04,500"));
        assert!(shifted.contains("00:02:01,956 --> 00:02:04,629"));
        assert!(shifted.contains("00:02:12,500 --> 00:02:15,000"));
        assert!(shifted.contains("- 00:00:00,000 --> 00:00:01,000 is not a cue"));
        assert!(shifted.ends_with('\n'));
    }

    #[test]
    fn test_strict_policy_reports_first_offender() {
        let doc = SubtitleDocument::from_text(SAMPLE_SRT);
        let result = resynchronize_with(&doc, -1001, ShiftPolicy::Reject);
        assert!(matches!(
            result,
            Err(SrtSyncError::OutOfRange { ref timestamp, offset: -1001 }) if timestamp == "00:00:01,000"
        ));
    }
}

// ============================================================================
// File Pipeline Tests
// ============================================================================

mod pipeline_tests {
    use super::*;

    #[test]
    fn test_resynchronize_file_into_directory() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("Area.51.srt");
        fs::write(&source, SAMPLE_SRT).unwrap();
        let out_dir = dir.path().join("out");

        let result = resynchronize_file(
            &source,
            TextEncoding::utf_8(),
            60_000,
            &out_dir,
            Some("Test.srt"),
        )
        .unwrap();

        assert_eq!(result.output_path, out_dir.join("Test.srt"));
        assert_eq!(result.stats.lines, SAMPLE_SRT.split('\n').count());
        assert_eq!(result.stats.timing_lines, 3);
        assert_eq!(result.stats.clamped, 0);

        let written = fs::read_to_string(&result.output_path).unwrap();
        assert!(written.starts_with("1\n00:01:01,000 --> 00:01:02,000\nHello\n"));
        assert_eq!(written.lines().count(), SAMPLE_SRT.lines().count());

        // Source untouched
        assert_eq!(fs::read_to_string(&source).unwrap(), SAMPLE_SRT);
    }

    #[test]
    fn test_resynchronize_file_defaults_to_source_name() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("Movie.srt");
        fs::write(&source, SAMPLE_SRT).unwrap();
        let out_dir = dir.path().join("shifted");

        let result =
            resynchronize_file(&source, TextEncoding::utf_8(), 500, &out_dir, None).unwrap();
        assert_eq!(result.output_path, out_dir.join("Movie.srt"));
    }

    #[test]
    fn test_resynchronize_file_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("in.srt");
        let target = dir.path().join("target.srt");
        fs::write(&source, SAMPLE_SRT).unwrap();
        fs::write(&target, "stale").unwrap();

        let result =
            resynchronize_file(&source, TextEncoding::utf_8(), 1000, &target, Some("Ignored.srt"))
                .unwrap();

        assert_eq!(result.output_path, target);
        assert!(fs::read_to_string(&target)
            .unwrap()
            .contains("00:00:02,000 --> 00:00:03,000"));
        assert!(!dir.path().join("Ignored.srt").exists());
    }

    #[test]
    fn test_resynchronize_file_in_place() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("in.srt");
        fs::write(&source, SAMPLE_SRT).unwrap();

        resynchronize_file(&source, TextEncoding::utf_8(), -500, &source, None).unwrap();
        assert!(fs::read_to_string(&source)
            .unwrap()
            .contains("00:00:00,500 --> 00:00:01,500"));
    }

    #[test]
    fn test_zero_offset_copies_bytes() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("in.srt");
        let crlf = SAMPLE_SRT.replace('\n', "\r\n");
        fs::write(&source, &crlf).unwrap();
        let target = dir.path().join("copy.srt");

        resynchronize_file(&source, TextEncoding::utf_8(), 0, &target, None).unwrap();
        assert_eq!(fs::read(&target).unwrap(), crlf.as_bytes());
    }

    #[test]
    fn test_zero_offset_copies_mixed_endings() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("in.srt");
        let text = "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n2\r\n00:00:03,000 --> 00:00:04,000\r\nWorld\r\n";
        fs::write(&source, text).unwrap();
        let target = dir.path().join("copy.srt");

        resynchronize_file(&source, TextEncoding::utf_8(), 0, &target, None).unwrap();
        assert_eq!(fs::read(&target).unwrap(), text.as_bytes());
    }

    #[test]
    fn test_carriage_return_file_is_shifted() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("mac.srt");
        fs::write(&source, "1\r00:00:01,000 --> 00:00:02,000\rHi\r").unwrap();
        let target = dir.path().join("out.srt");

        let result =
            resynchronize_file(&source, TextEncoding::utf_8(), 1000, &target, None).unwrap();
        assert_eq!(result.stats.timing_lines, 1);
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "1\r00:00:02,000 --> 00:00:03,000\rHi\r"
        );
    }

    #[test]
    fn test_crlf_is_preserved_when_shifting() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("in.srt");
        fs::write(&source, "1\r\n00:00:01,000 --> 00:00:02,000\r\nHi\r\n").unwrap();
        let target = dir.path().join("out.srt");

        resynchronize_file(&source, TextEncoding::utf_8(), 1000, &target, None).unwrap();
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "1\r\n00:00:02,000 --> 00:00:03,000\r\nHi\r\n"
        );
    }

    #[test]
    fn test_windows_1250_round_trip() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("cz.srt");
        let text = "1\n00:00:01,000 --> 00:00:02,000\nPříliš žluťoučký kůň\n";
        let (bytes, _, had_errors) = encoding_rs::WINDOWS_1250.encode(text);
        assert!(!had_errors);
        fs::write(&source, &bytes).unwrap();
        let target = dir.path().join("out.srt");

        resynchronize_file(&source, TextEncoding::windows_1250(), 250, &target, None).unwrap();

        let written = fs::read(&target).unwrap();
        let (decoded, _, _) = encoding_rs::WINDOWS_1250.decode(&written);
        assert_eq!(
            decoded,
            "1\n00:00:01,250 --> 00:00:02,250\nPříliš žluťoučký kůň\n"
        );
    }

    #[test]
    fn test_missing_source() {
        let dir = TempDir::new().unwrap();
        let result = resynchronize_file(
            &dir.path().join("missing.srt"),
            TextEncoding::utf_8(),
            1000,
            dir.path(),
            None,
        );
        assert!(matches!(result, Err(SrtSyncError::NotFound(_))));
    }

    #[test]
    fn test_undecodable_source() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("latin2.srt");
        fs::write(&source, [b'1', b'\n', 0xE8, 0xFD]).unwrap();

        let result = resynchronize_file(&source, TextEncoding::utf_8(), 1000, dir.path(), None);
        assert!(matches!(result, Err(SrtSyncError::Encoding(_))));
    }

    #[test]
    fn test_strict_config_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("in.srt");
        fs::write(&source, SAMPLE_SRT).unwrap();
        let target = dir.path().join("out.srt");

        let config = ResyncConfig {
            encoding: TextEncoding::utf_8(),
            offset_ms: -5000,
            policy: ShiftPolicy::Reject,
            output_name: None,
        };
        let result = resynchronize_file_with(&source, &target, &config);

        assert!(matches!(result, Err(SrtSyncError::OutOfRange { .. })));
        assert!(!target.exists());
    }

    #[test]
    fn test_clamp_config_counts() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("in.srt");
        fs::write(&source, SAMPLE_SRT).unwrap();
        let target = dir.path().join("out.srt");

        let config = ResyncConfig {
            offset_ms: -1500,
            ..ResyncConfig::from_config(
                &Config {
                    encoding: TextEncoding::utf_8(),
                    ..Config::default()
                },
                0,
            )
        };
        let result = resynchronize_file_with(&source, &target, &config).unwrap();

        assert_eq!(result.stats.clamped, 1);
        assert!(fs::read_to_string(&target)
            .unwrap()
            .starts_with("1\n00:00:00,000 --> 00:00:00,500\n"));
    }
}
