//! # Puzzles
//!
//! Challenge generation and answer checks, one rule per stage.
//!
//! Only the Bitwise puzzle is randomized. Its operands must be the ones the
//! visitor was shown, so validation takes them as input instead of drawing
//! new ones.

use crate::primitives::{
    ASCII_HEART, BINARY_MESSAGE, BINARY_PLAINTEXT, BITWISE_OPERAND_MAX, BITWISE_OPERAND_MIN,
};
use crate::types::QuestError;
use rand::Rng;
use serde::{Deserialize, Serialize};

// =============================================================================
// BITWISE CHALLENGE
// =============================================================================

/// The two operands shown by the Bitwise stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitwiseChallenge {
    pub a: u32,
    pub b: u32,
}

impl BitwiseChallenge {
    /// Build a challenge from known operands, rejecting values outside
    /// `[BITWISE_OPERAND_MIN, BITWISE_OPERAND_MAX]`.
    pub fn new(a: u32, b: u32) -> Result<Self, QuestError> {
        let range = BITWISE_OPERAND_MIN..=BITWISE_OPERAND_MAX;
        if !range.contains(&a) || !range.contains(&b) {
            return Err(QuestError::InvalidOperands(format!(
                "operands must be within {}..={}, got {} and {}",
                BITWISE_OPERAND_MIN, BITWISE_OPERAND_MAX, a, b
            )));
        }
        Ok(Self { a, b })
    }

    /// Draw both operands uniformly from the operand range.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            a: rng.gen_range(BITWISE_OPERAND_MIN..=BITWISE_OPERAND_MAX),
            b: rng.gen_range(BITWISE_OPERAND_MIN..=BITWISE_OPERAND_MAX),
        }
    }

    /// The answer this challenge expects.
    #[must_use]
    pub const fn expected(&self) -> u32 {
        self.a ^ self.b
    }
}

// =============================================================================
// PUZZLE CHALLENGE
// =============================================================================

/// What a stage shows when it is entered. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PuzzleChallenge {
    Bitwise(BitwiseChallenge),
    Binary { message: &'static str },
    Ascii { art: &'static str },
    ApiConnect,
}

impl PuzzleChallenge {
    /// The fixed Base64-stage challenge.
    #[must_use]
    pub const fn binary() -> Self {
        PuzzleChallenge::Binary {
            message: BINARY_MESSAGE,
        }
    }

    /// The fixed Ascii-stage challenge.
    #[must_use]
    pub const fn ascii() -> Self {
        PuzzleChallenge::Ascii { art: ASCII_HEART }
    }
}

// =============================================================================
// INCORRECT REASON
// =============================================================================

/// Why a submission was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncorrectReason {
    /// Nothing (or only whitespace) was submitted.
    MissingAnswer,
    /// The Bitwise answer was not an integer.
    NotANumber,
    /// Well-formed, but not the expected answer.
    WrongAnswer,
    /// No Bitwise operands were shown in this session.
    NoPendingChallenge,
    /// The submission exceeded `MAX_ANSWER_LENGTH`.
    TooLong,
}

impl IncorrectReason {
    /// Text suitable for re-prompting the visitor.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            IncorrectReason::MissingAnswer => "Please enter an answer.",
            IncorrectReason::NotANumber => "The answer must be a whole number.",
            IncorrectReason::WrongAnswer => "Incorrect answer! Try again.",
            IncorrectReason::NoPendingChallenge => "This puzzle has expired. Here is a new one.",
            IncorrectReason::TooLong => "That answer is far too long.",
        }
    }
}

impl std::fmt::Display for IncorrectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

// =============================================================================
// ANSWER CHECKS
// =============================================================================

/// Trimmed answer, or `None` if nothing meaningful was submitted.
fn non_blank(answer: Option<&str>) -> Option<&str> {
    answer.map(str::trim).filter(|a| !a.is_empty())
}

/// Check a Bitwise answer against the operands that were shown.
pub fn check_bitwise(
    answer: Option<&str>,
    pending: Option<&BitwiseChallenge>,
) -> Result<(), IncorrectReason> {
    let answer = non_blank(answer).ok_or(IncorrectReason::MissingAnswer)?;
    let value: i64 = answer.parse().map_err(|_| IncorrectReason::NotANumber)?;
    let challenge = pending.ok_or(IncorrectReason::NoPendingChallenge)?;

    if value == i64::from(challenge.expected()) {
        Ok(())
    } else {
        Err(IncorrectReason::WrongAnswer)
    }
}

/// Check a Base64-stage answer. A plain string comparison; nothing is decoded.
pub fn check_binary(answer: Option<&str>) -> Result<(), IncorrectReason> {
    let answer = non_blank(answer).ok_or(IncorrectReason::MissingAnswer)?;
    if answer.eq_ignore_ascii_case(BINARY_PLAINTEXT) {
        Ok(())
    } else {
        Err(IncorrectReason::WrongAnswer)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn generated_operands_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let c = BitwiseChallenge::generate(&mut rng);
            assert!((BITWISE_OPERAND_MIN..=BITWISE_OPERAND_MAX).contains(&c.a));
            assert!((BITWISE_OPERAND_MIN..=BITWISE_OPERAND_MAX).contains(&c.b));
        }
    }

    #[test]
    fn generation_is_seed_deterministic() {
        let first = BitwiseChallenge::generate(&mut StdRng::seed_from_u64(42));
        let second = BitwiseChallenge::generate(&mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(BitwiseChallenge::new(0, 5).is_err());
        assert!(BitwiseChallenge::new(5, 101).is_err());
        assert!(BitwiseChallenge::new(1, 100).is_ok());
    }

    #[test]
    fn bitwise_accepts_xor() {
        let c = BitwiseChallenge { a: 12, b: 10 };
        assert_eq!(c.expected(), 6);
        assert_eq!(check_bitwise(Some("6"), Some(&c)), Ok(()));
        assert_eq!(check_bitwise(Some("  6 "), Some(&c)), Ok(()));
    }

    #[test]
    fn bitwise_rejections() {
        let c = BitwiseChallenge { a: 12, b: 10 };
        assert_eq!(
            check_bitwise(Some("7"), Some(&c)),
            Err(IncorrectReason::WrongAnswer)
        );
        assert_eq!(
            check_bitwise(Some("-6"), Some(&c)),
            Err(IncorrectReason::WrongAnswer)
        );
        assert_eq!(
            check_bitwise(Some("six"), Some(&c)),
            Err(IncorrectReason::NotANumber)
        );
        assert_eq!(
            check_bitwise(None, Some(&c)),
            Err(IncorrectReason::MissingAnswer)
        );
        assert_eq!(
            check_bitwise(Some("6"), None),
            Err(IncorrectReason::NoPendingChallenge)
        );
    }

    #[test]
    fn binary_is_case_insensitive_and_trimmed() {
        assert_eq!(check_binary(Some("i love you")), Ok(()));
        assert_eq!(check_binary(Some("  I LOVE YOU\n")), Ok(()));
        assert_eq!(
            check_binary(Some("I love you!")),
            Err(IncorrectReason::WrongAnswer)
        );
        assert_eq!(
            check_binary(Some("I  love you")),
            Err(IncorrectReason::WrongAnswer)
        );
        assert_eq!(check_binary(Some("   ")), Err(IncorrectReason::MissingAnswer));
    }
}
