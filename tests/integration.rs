use fipp::encoding::TextEncoding;
use fipp::output::OutputWriter;
use fipp::policy::PasswordPolicy;
use fipp::processor::{filter_stream, Processor, RunConfig};
use fipp::{ErrorKind, FilterRun};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

fn run_file(dir: &Path, policy: PasswordPolicy, input: &[u8], encoding: TextEncoding) -> (FilterRun, Vec<u8>) {
    let input_path = dir.join("input.txt");
    let output_path = dir.join("output.txt");
    fs::write(&input_path, input).unwrap();

    let config = RunConfig {
        policy,
        input: input_path,
        output: output_path.clone(),
        encoding,
    };
    let run = Processor::new(config).run().unwrap();
    (run, fs::read(&output_path).unwrap())
}

/// Letters only, length 8, no uppercase requirement
#[test]
fn test_letters_only_policy() {
    let dir = TempDir::new().unwrap();
    let policy = PasswordPolicy::new(8, false, false, None).unwrap();

    let (run, out) = run_file(
        dir.path(),
        policy,
        b"Password\nPassw0rd\nPASSWORD\npass word\n",
        TextEncoding::Latin1,
    );

    // PASSWORD passes as well: eight letters, no digits, no specials
    assert_eq!(out, b"Password\nPASSWORD\n");
    assert_eq!(run.total_seen, 4);
    assert_eq!(run.total_kept, 2);
}

#[test]
fn test_uppercase_minimum_with_numbers() {
    let dir = TempDir::new().unwrap();
    let policy = PasswordPolicy::new(8, false, true, Some(2)).unwrap();

    let (run, out) = run_file(
        dir.path(),
        policy,
        b"Passw0rd\nPAssw0rd\npassw0rd\n",
        TextEncoding::Latin1,
    );

    assert_eq!(out, b"PAssw0rd\n");
    assert_eq!(run.total_seen, 3);
    assert_eq!(run.total_kept, 1);
}

#[test]
fn test_empty_input_creates_empty_output() {
    let dir = TempDir::new().unwrap();

    let (run, out) = run_file(dir.path(), PasswordPolicy::default(), b"", TextEncoding::Latin1);

    assert!(out.is_empty());
    assert_eq!(run.total_seen, 0);
    assert_eq!(run.total_kept, 0);
}

#[test]
fn test_missing_input_leaves_output_untouched() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("existing.txt");
    fs::write(&output, "keep me\n").unwrap();

    let config = RunConfig {
        policy: PasswordPolicy::default(),
        input: dir.path().join("missing.txt"),
        output: output.clone(),
        encoding: TextEncoding::Latin1,
    };
    let err = Processor::new(config).run().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Resource);
    assert_eq!(fs::read_to_string(&output).unwrap(), "keep me\n");
}

#[test]
fn test_missing_input_creates_nothing() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("new_dir/out.txt");

    let config = RunConfig {
        policy: PasswordPolicy::default(),
        input: dir.path().join("missing.txt"),
        output: output.clone(),
        encoding: TextEncoding::Latin1,
    };

    assert!(Processor::new(config).run().is_err());
    assert!(!output.exists());
    assert!(!dir.path().join("new_dir").exists());
}

#[test]
fn test_all_digits_rejected_when_numbers_disallowed() {
    let dir = TempDir::new().unwrap();

    let (run, out) = run_file(dir.path(), PasswordPolicy::default(), b"12345678\n", TextEncoding::Latin1);

    assert!(out.is_empty());
    assert_eq!(run.rejected_by(fipp::policy::Rejection::Numeric), 1);
}

#[test]
fn test_last_line_without_newline_counts() {
    let dir = TempDir::new().unwrap();

    let (run, out) = run_file(dir.path(), PasswordPolicy::default(), b"abc\nPassword", TextEncoding::Latin1);

    assert_eq!(run.total_seen, 2);
    assert_eq!(out, b"Password\n");
}

#[test]
fn test_trailing_blank_line_counts() {
    let dir = TempDir::new().unwrap();

    // "a\n\n" is two records: "a" and ""
    let (run, _) = run_file(dir.path(), PasswordPolicy::default(), b"a\n\n", TextEncoding::Latin1);

    assert_eq!(run.total_seen, 2);
}

#[test]
fn test_crlf_input() {
    let dir = TempDir::new().unwrap();

    let (run, out) = run_file(
        dir.path(),
        PasswordPolicy::default(),
        b"Password\r\nSecretly\r\nnope\r\n",
        TextEncoding::Latin1,
    );

    assert_eq!(out, b"Password\nSecretly\n");
    assert_eq!(run.total_seen, 3);
}

#[test]
fn test_order_preserved_and_duplicates_kept() {
    let dir = TempDir::new().unwrap();

    let (_, out) = run_file(
        dir.path(),
        PasswordPolicy::default(),
        b"zzzzzzzz\naaaaaaaa\nzzzzzzzz\nmmmmmmmm\n",
        TextEncoding::Latin1,
    );

    assert_eq!(out, b"zzzzzzzz\naaaaaaaa\nzzzzzzzz\nmmmmmmmm\n");
}

#[test]
fn test_idempotent_runs() {
    let dir = TempDir::new().unwrap();
    let input = b"Password\nPassw0rd\n  Letmein1 \nLETMEINN\nsp ace!!\n";
    let policy = PasswordPolicy::new(8, false, true, Some(1)).unwrap();

    let (first_run, first) = run_file(dir.path(), policy, input, TextEncoding::Latin1);
    let (second_run, second) = run_file(dir.path(), policy, input, TextEncoding::Latin1);

    assert_eq!(first, second);
    assert_eq!(first_run, second_run);
}

#[test]
fn test_counting_invariant() {
    let dir = TempDir::new().unwrap();
    let mut input = Vec::new();
    for i in 0..500 {
        input.extend_from_slice(format!("Cand{:04}\nword{}\n", i, i).as_bytes());
    }
    let policy = PasswordPolicy::new(8, false, true, None).unwrap();

    let (run, out) = run_file(dir.path(), policy, &input, TextEncoding::Latin1);

    assert_eq!(run.total_seen, 1000);
    assert!(run.total_seen >= run.total_kept);
    let written = out.iter().filter(|&&b| b == b'\n').count() as u64;
    assert_eq!(written, run.total_kept);
}

#[test]
fn test_interior_space_rejected_outer_space_trimmed() {
    let dir = TempDir::new().unwrap();

    let (_, out) = run_file(
        dir.path(),
        PasswordPolicy::default(),
        b" Password \nPass word\n",
        TextEncoding::Latin1,
    );

    assert_eq!(out, b"Password\n");
}

#[test]
fn test_latin1_round_trip_with_specials() {
    let dir = TempDir::new().unwrap();
    let policy = PasswordPolicy::new(6, true, false, None).unwrap();

    // 0xE9 is e-acute in Latin-1, and 0x81 has no printable meaning but still decodes
    let (run, out) = run_file(dir.path(), policy, b"caf\xE9!!\n\x81abcde\n", TextEncoding::Latin1);

    assert_eq!(run.total_kept, 2);
    assert_eq!(out, b"caf\xE9!!\n\x81abcde\n");
}

#[test]
fn test_utf16_input_and_output() {
    let dir = TempDir::new().unwrap();
    let input: Vec<u8> = [0xFF, 0xFE]
        .into_iter()
        .chain("Password\nshort\n".encode_utf16().flat_map(u16::to_le_bytes))
        .collect();

    let (run, out) = run_file(dir.path(), PasswordPolicy::default(), &input, TextEncoding::Utf16);

    let expected: Vec<u8> = [0xFF, 0xFE]
        .into_iter()
        .chain("Password\n".encode_utf16().flat_map(u16::to_le_bytes))
        .collect();
    assert_eq!(run.total_seen, 2);
    assert_eq!(out, expected);
}

#[test]
fn test_decode_failure_keeps_earlier_output() {
    let dir = TempDir::new().unwrap();
    let input_path = dir.path().join("input.txt");
    let output_path = dir.path().join("output.txt");
    fs::write(&input_path, b"Password\nAbcdefgh\nBad\xC3(line\nZyxwvuts\n").unwrap();

    let config = RunConfig {
        policy: PasswordPolicy::default(),
        input: input_path,
        output: output_path.clone(),
        encoding: TextEncoding::Utf8,
    };
    let err = Processor::new(config).run().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(err.to_string().contains("UTF-8"));
    assert!(err.to_string().contains("line 3"));
    assert_eq!(fs::read(&output_path).unwrap(), b"Password\nAbcdefgh\n");
}

#[test]
fn test_filter_stream_from_memory() {
    let policy = PasswordPolicy::new(4, true, true, None).unwrap();
    let mut output = OutputWriter::new(Vec::new(), TextEncoding::Utf8);

    let run = filter_stream(
        &policy,
        Cursor::new("ab c\nabcd\nabcde\nö1!x\n".as_bytes().to_vec()),
        TextEncoding::Utf8,
        &mut output,
    )
    .unwrap();

    assert_eq!(run.total_seen, 4);
    assert_eq!(run.total_kept, 3);
    assert_eq!(output.into_inner().unwrap(), "ab c\nabcd\nö1!x\n".as_bytes());
}
