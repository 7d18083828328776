//! End-to-end assembler tests, driven entirely through the library API so
//! they don't depend on external `.asm`/`.hack` fixture files.

use assembler::{assemble, words_to_bin_bytes, words_to_hack_text};

fn lines(src: &str) -> Vec<String> {
    src.lines().map(str::to_string).collect()
}

/// `Add.asm`-style program: adds two constants and stores the result.
const ADD_PROGRAM: &str = "\
@2
D=A
@3
D=D+A
@0
M=D
";

#[test]
fn add_program_assembles_to_expected_words() {
    let words = assemble(&lines(ADD_PROGRAM)).unwrap();
    assert_eq!(
        words,
        vec![
            0b0000_0000_0000_0010, // @2
            0b1110_1100_0001_0000, // D=A
            0b0000_0000_0000_0011, // @3
            0b1110_0000_1001_0000, // D=D+A
            0b0000_0000_0000_0000, // @0
            0b1110_0011_0000_1000, // M=D
        ]
    );
}

/// `Max.asm`-style program: conditional branching with labels.
const MAX_PROGRAM: &str = "\
@0
D=M
@1
D=D-M
@OUTPUT_FIRST
D;JGT
@1
D=M
@OUTPUT_D
0;JMP
(OUTPUT_FIRST)
@0
D=M
(OUTPUT_D)
@2
M=D
(END)
@END
0;JMP
";

#[test]
fn max_program_resolves_labels_and_round_trips_through_hack_text() {
    let words = assemble(&lines(MAX_PROGRAM)).unwrap();

    // Exactly one word per non-label, non-blank instruction.
    assert_eq!(words.len(), 14);

    let hack_text = words_to_hack_text(&words);
    assert_eq!(hack_text.lines().count(), words.len());
    assert!(hack_text.lines().all(|l| l.len() == 16
        && l.chars().all(|c| c == '0' || c == '1')));
}

#[test]
fn bin_output_is_two_bytes_per_instruction_big_endian() {
    let words = assemble(&lines(ADD_PROGRAM)).unwrap();
    let bytes = words_to_bin_bytes(&words);
    assert_eq!(bytes.len(), words.len() * 2);
    assert_eq!(u16::from_be_bytes([bytes[0], bytes[1]]), words[0]);
}

#[test]
fn every_c_instruction_word_has_top_three_bits_set() {
    let words = assemble(&lines(ADD_PROGRAM)).unwrap();
    // D=A, D=D+A, M=D are C-instructions (indices 1, 3, 5).
    for &idx in &[1, 3, 5] {
        assert_eq!(words[idx] & 0xE000, 0xE000);
    }
}

#[test]
fn every_a_instruction_word_has_high_bit_clear() {
    let words = assemble(&lines(ADD_PROGRAM)).unwrap();
    for &idx in &[0, 2, 4] {
        assert_eq!(words[idx] & 0x8000, 0);
    }
}

#[test]
fn first_undeclared_variable_binds_to_address_16() {
    let words = assemble(&lines("@counter\n@limit\n@counter\n")).unwrap();
    assert_eq!(words, vec![16, 17, 16]);
}

#[test]
fn assembling_twice_is_deterministic() {
    let first = assemble(&lines(MAX_PROGRAM)).unwrap();
    let second = assemble(&lines(MAX_PROGRAM)).unwrap();
    assert_eq!(first, second);
}
