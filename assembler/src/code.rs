//! Code generation module for Hack assembly language
//!
//! Translates assembly mnemonics to binary machine code using perfect hash functions (PHF).
//! PHF provides O(1) lookup with zero runtime overhead - the hash table is computed at compile time.
//!
//! # Performance
//! - All lookups use PHF maps: O(1) compile-time perfect hashing
//! - String formatting uses standard library (optimized by LLVM)
//! - Hot paths are inlined for better performance

use phf::phf_map;

use crate::errors::AssemblerError;

/// Destination mnemonic to binary code mapping (3 bits)
///
/// Maps destination mnemonics to their 3-bit binary representation.
/// Empty string represents null destination.
static DEST_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "" => "000",
    "M" => "001",
    "D" => "010",
    "MD" => "011",
    "A" => "100",
    "AM" => "101",
    "AD" => "110",
    "AMD" => "111",
};

/// Computation mnemonic to binary code mapping (7 bits: 1 bit 'a' + 6 bits 'cccccc')
///
/// Includes both a=0 (A register) and a=1 (M register) variants.
/// The first bit indicates which register to use: 0 for A, 1 for M.
static COMP_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    // a=0 (A register operations)
    "0" => "0101010",
    "1" => "0111111",
    "-1" => "0111010",
    "D" => "0001100",
    "A" => "0110000",
    "!D" => "0001101",
    "!A" => "0110001",
    "-D" => "0001111",
    "-A" => "0110011",
    "D+1" => "0011111",
    "A+1" => "0110111",
    "D-1" => "0001110",
    "A-1" => "0110010",
    "D+A" => "0000010",
    "D-A" => "0010011",
    "A-D" => "0000111",
    "D&A" => "0000000",
    "D|A" => "0010101",

    // a=1 (M register operations)
    "M" => "1110000",
    "!M" => "1110001",
    "-M" => "1110011",
    "M+1" => "1110111",
    "M-1" => "1110010",
    "D+M" => "1000010",
    "D-M" => "1010011",
    "M-D" => "1000111",
    "D&M" => "1000000",
    "D|M" => "1010101",
};

/// Jump mnemonic to binary code mapping (3 bits)
///
/// Maps jump mnemonics to their 3-bit binary representation.
/// Empty string represents no jump.
static JUMP_MAP: phf::Map<&'static str, &'static str> = phf_map! {
    "" => "000",
    "JGT" => "001",
    "JEQ" => "010",
    "JGE" => "011",
    "JLT" => "100",
    "JNE" => "101",
    "JLE" => "110",
    "JMP" => "111",
};

/// Translates a destination mnemonic to its binary code
///
/// # Errors
/// Returns [`AssemblerError::UnknownDest`] if `mnemonic` is not one of the
/// eight valid destination combinations.
///
/// # Performance
/// Uses PHF for O(1) lookup with zero runtime overhead
#[inline]
pub fn dest(mnemonic: &str) -> Result<&'static str, AssemblerError> {
    DEST_MAP
        .get(mnemonic)
        .copied()
        .ok_or_else(|| AssemblerError::UnknownDest(mnemonic.to_string()))
}

/// Translates a computation mnemonic to its binary code
///
/// # Errors
/// Returns [`AssemblerError::UnknownComp`] if `mnemonic` is not one of the
/// 18 valid computation mnemonics.
///
/// # Performance
/// Uses PHF for O(1) lookup with zero runtime overhead
#[inline]
pub fn comp(mnemonic: &str) -> Result<&'static str, AssemblerError> {
    COMP_MAP
        .get(mnemonic)
        .copied()
        .ok_or_else(|| AssemblerError::UnknownComp(mnemonic.to_string()))
}

/// Translates a jump mnemonic to its binary code
///
/// # Errors
/// Returns [`AssemblerError::UnknownJump`] if `mnemonic` is not one of the
/// seven valid jump mnemonics or the empty string.
///
/// # Performance
/// Uses PHF for O(1) lookup with zero runtime overhead
#[inline]
pub fn jump(mnemonic: &str) -> Result<&'static str, AssemblerError> {
    JUMP_MAP
        .get(mnemonic)
        .copied()
        .ok_or_else(|| AssemblerError::UnknownJump(mnemonic.to_string()))
}

/// Encodes a complete C-instruction as a 16-character bit string.
///
/// C-instruction format: 111accccccdddjjj (16 bits)
/// - 111: C-instruction prefix (3 bits)
/// - acccccc: computation (7 bits)
/// - ddd: destination (3 bits)
/// - jjj: jump (3 bits)
///
/// # Errors
/// Propagates [`AssemblerError`] from [`dest`], [`comp`], or [`jump`] if any
/// mnemonic is invalid.
///
/// # Example
/// ```
/// use assembler::code::encode_c_instruction;
/// let instruction = encode_c_instruction("D", "D+1", "").unwrap();
/// assert_eq!(instruction, "1110011111010000");
/// ```
#[inline]
pub fn encode_c_instruction(
    dest_mnemonic: &str,
    comp_mnemonic: &str,
    jump_mnemonic: &str,
) -> Result<String, AssemblerError> {
    Ok(format!(
        "111{}{}{}",
        comp(comp_mnemonic)?,
        dest(dest_mnemonic)?,
        jump(jump_mnemonic)?
    ))
}

/// Encodes a complete C-instruction as its 16-bit machine word.
///
/// This is the form used by the two-pass assembler, which emits machine
/// words directly rather than going through a bit-string intermediate. The
/// encoding follows `0xE000 | a | (comp<<6) | dest | jmp`: bits 13-15 are
/// always `111`, bit 12 (`a`) is set whenever `M` appears in `comp`.
///
/// # Errors
/// Returns [`AssemblerError::UnknownComp`], [`AssemblerError::UnknownDest`],
/// or [`AssemblerError::UnknownJump`] for an invalid mnemonic.
///
/// # Example
/// ```
/// use assembler::code::encode_c_word;
/// // D=M+1 -> a=1, comp=A+1 (0x37), dest=D (0x10), jmp=none
/// assert_eq!(encode_c_word("D", "M+1", "").unwrap(), 0xFDD0);
/// ```
pub fn encode_c_word(
    dest_mnemonic: &str,
    comp_mnemonic: &str,
    jump_mnemonic: &str,
) -> Result<u16, AssemblerError> {
    let dest_bits = dest_bits(dest_mnemonic)?;
    let jump_bits = jump_bits(jump_mnemonic)?;
    let (a_bit, comp_code) = comp_bits(comp_mnemonic)?;

    Ok(0xE000 | a_bit | (comp_code << 6) | dest_bits | jump_bits)
}

fn dest_bits(mnemonic: &str) -> Result<u16, AssemblerError> {
    dest(mnemonic)?;
    mnemonic.chars().try_fold(0u16, |acc, ch| {
        let bit = match ch {
            'A' => 0x20,
            'D' => 0x10,
            'M' => 0x08,
            _ => return Err(AssemblerError::UnknownDest(mnemonic.to_string())),
        };
        Ok(acc | bit)
    })
}

fn jump_bits(mnemonic: &str) -> Result<u16, AssemblerError> {
    Ok(match mnemonic {
        "" => 0,
        "JGT" => 1,
        "JEQ" => 2,
        "JGE" => 3,
        "JLT" => 4,
        "JNE" => 5,
        "JLE" => 6,
        "JMP" => 7,
        other => return Err(AssemblerError::UnknownJump(other.to_string())),
    })
}

/// Returns `(a_bit, 6-bit comp code)` for a `comp` mnemonic, substituting
/// `M` for `A` and setting the `a` bit per the spec's encoding rule.
fn comp_bits(mnemonic: &str) -> Result<(u16, u16), AssemblerError> {
    let (a_bit, normalized) = if mnemonic.contains('M') {
        (0x1000u16, mnemonic.replace('M', "A"))
    } else {
        (0u16, mnemonic.to_string())
    };

    let code = match normalized.as_str() {
        "0" => 0x2A,
        "1" => 0x3F,
        "-1" => 0x3A,
        "D" => 0x0C,
        "A" => 0x30,
        "!D" => 0x0D,
        "!A" => 0x31,
        "-D" => 0x0F,
        "-A" => 0x33,
        "D+1" => 0x1F,
        "A+1" => 0x37,
        "D-1" => 0x0E,
        "A-1" => 0x32,
        "D+A" => 0x02,
        "D-A" => 0x13,
        "A-D" => 0x07,
        "D&A" => 0x00,
        "D|A" => 0x15,
        _ => return Err(AssemblerError::UnknownComp(mnemonic.to_string())),
    };

    Ok((a_bit, code))
}

/// Encodes an A-instruction
///
/// A-instruction format: 0vvvvvvvvvvvvvvv (16 bits)
/// - 0: A-instruction prefix (1 bit)
/// - vvvvvvvvvvvvvvv: 15-bit address/value
///
/// The address is masked to its low 15 bits, matching the `address & 0x7FFF`
/// rule from the assembler's contract.
///
/// # Example
/// ```
/// use assembler::code::encode_a_instruction;
/// let instruction = encode_a_instruction(100);
/// assert_eq!(instruction, "0000000001100100");
/// ```
#[inline]
#[must_use]
pub fn encode_a_instruction(address: u16) -> String {
    format!("{:016b}", address & 0x7FFF)
}

/// Encodes an A-instruction as its 16-bit machine word.
#[inline]
#[must_use]
pub fn encode_a_word(address: u16) -> u16 {
    address & 0x7FFF
}

/// Validates mnemonics for all three parts of a C-instruction
///
/// Useful for error checking and validation.
///
/// # Example
/// ```
/// use assembler::code::validate_mnemonics;
/// let (d, c, j) = validate_mnemonics("D", "D+1", "JMP");
/// assert!(d && c && j);
/// ```
#[inline]
#[must_use]
pub fn validate_mnemonics(
    dest_mnemonic: &str,
    comp_mnemonic: &str,
    jump_mnemonic: &str,
) -> (bool, bool, bool) {
    (
        DEST_MAP.contains_key(dest_mnemonic),
        COMP_MAP.contains_key(comp_mnemonic),
        JUMP_MAP.contains_key(jump_mnemonic),
    )
}
