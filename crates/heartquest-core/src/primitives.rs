//! # Innate Primitives
//!
//! Hardcoded puzzle constants for the HeartQuest CORE.
//!
//! Every puzzle's fixed content is compiled into the binary and is immutable
//! at runtime. Only the Bitwise operands are drawn per presentation.

/// Number of stages in the quest.
pub const STAGE_COUNT: usize = 4;

/// Smallest operand shown by the Bitwise puzzle (inclusive).
pub const BITWISE_OPERAND_MIN: u32 = 1;

/// Largest operand shown by the Bitwise puzzle (inclusive).
pub const BITWISE_OPERAND_MAX: u32 = 100;

/// The message shown by the Base64 stage, as space-separated 8-bit groups.
pub const BINARY_MESSAGE: &str =
    "01001001 00100000 01101100 01101111 01110110 01100101 00100000 01111001 01101111 01110101";

/// The plaintext `BINARY_MESSAGE` encodes. Submissions are compared against
/// this case-insensitively after trimming.
pub const BINARY_PLAINTEXT: &str = "I love you";

/// The artifact shown by the Ascii stage.
pub const ASCII_HEART: &str = r"
    1111001111100     0000110000011
  11111111111111111 00000000000000000
 1111111111111111111000000000000000000
111111111111111111111100000000000000000
11111111111111111111111000000000000000011
111111111111111111111111100000000000000111
 11111111111111111111111110000000000001111
 111111111111111111111111110000000000011111
  1111111111111111111111111000000000111111
   11111111111111111111111100000001111111
    111111111111111111111110000011111111
      1111111111111111111100001111111111
       11111111111111111100111111111111
         111111111111111111111111111
           1111111111111111111111
             11111111111111111
               111111111111
                 1111111
                   111
                    1
";

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for a submitted answer, in bytes.
///
/// Longer submissions are rejected as incorrect without being inspected.
pub const MAX_ANSWER_LENGTH: usize = 256;

/// Maximum length for a session identifier, in bytes.
pub const MAX_SESSION_ID_LENGTH: usize = 64;

/// Random bytes behind a freshly generated session identifier.
pub const SESSION_TOKEN_BYTES: usize = 16;
