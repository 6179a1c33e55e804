//! Reversible seed codes for replaying a session.
//! Code format: AX-<WORD><NN>, e.g., AX-CAPTION42, AX-BRAILLE07

const CODE_PREFIX: &str = "AX";

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash = (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

fn sanitize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub const WORD_LIST: [&str; 64] = [
    "ALTTEXT", "CAPTION", "CONTRAST", "FOCUS", "ARIA", "LANDMRK", "HEADING", "LABEL", "SKIPLNK",
    "KEYBRD", "ZOOM", "REFLOW", "BRAILLE", "SCREEN", "READER", "MAGNIFY", "HICONTR", "PALETTE",
    "TARGET", "TABORDR", "LIVEREG", "ROLE", "STATE", "NAME", "VALUE", "LEGEND", "FIELDST", "HINT",
    "ERROR", "SUGGEST", "TIMEOUT", "PAUSE", "MOTION", "REDUCE", "FLASH", "SEIZURE", "PLAIN",
    "SIMPLE", "CLEAR", "ROBUST", "OPERABL", "PERCEIV", "UNDERST", "INCLUDE", "EQUAL", "ACCESS",
    "ADAPT", "ASSIST", "SWITCH", "VOICE", "GESTURE", "POINTER", "CURSOR", "OUTLINE", "BORDER",
    "SPACING", "FONT", "SERIF", "SANS", "DYSLEX", "TRANSCR", "SIGNLNG", "AUDIO", "HAPTIC",
];

#[inline]
fn pack(word_index: u16, nn: u8) -> u16 {
    word_index & 0x01FF | ((u16::from(nn) & 0x7F) << 9)
}

#[inline]
fn unpack(packed: u16) -> (u16, u8) {
    (packed & 0x01FF, ((packed >> 9) & 0x7F) as u8)
}

fn compose_seed(word_index: u16, nn: u8) -> u64 {
    let packed = pack(word_index, nn);
    let mut buf = [0u8; 10];
    buf[..7].copy_from_slice(b"A11YCH-");
    buf[7] = (packed & 0xFF) as u8;
    buf[8] = (packed >> 8) as u8;
    buf[9] = 0x5A;
    let h = fnv1a64(&buf);
    (h & 0xFFFF_FFFF_FFFF_0000) | u64::from(packed)
}

/// Render `seed` as a seed code. Only the low 16 bits are represented, so
/// the code replays `seed` only when `seed` came from a code; see
/// [`replay_code`].
#[must_use]
pub fn encode_seed_code(seed: u64) -> String {
    let (wi, nn) = unpack((seed & 0xFFFF) as u16);
    let word = WORD_LIST[usize::from(wi) % WORD_LIST.len()];
    format!("{CODE_PREFIX}-{word}{:02}", nn % 100)
}

/// Seed for a code produced by [`encode_seed_code`], case-insensitive.
#[must_use]
pub fn decode_seed_code(code: &str) -> Option<u64> {
    let (prefix, rest) = code.trim().split_once('-')?;
    if !prefix.eq_ignore_ascii_case(CODE_PREFIX) || rest.len() < 3 {
        return None;
    }
    let (word_part, nn_part) = rest.split_at_checked(rest.len() - 2)?;
    let nn: u8 = nn_part.parse().ok()?;
    let word = sanitize_word(word_part);
    let idx = WORD_LIST.iter().position(|w| sanitize_word(w) == word)?;
    let wi = u16::try_from(idx).ok()?;
    Some(compose_seed(wi, nn))
}

/// Code that decodes back to exactly `seed`, if one exists.
#[must_use]
pub fn replay_code(seed: u64) -> Option<String> {
    let code = encode_seed_code(seed);
    (decode_seed_code(&code) == Some(seed)).then_some(code)
}

/// Fresh seed code derived from arbitrary entropy.
#[must_use]
pub fn generate_seed_code(entropy: u64) -> String {
    let wi = u16::try_from(entropy % WORD_LIST.len() as u64).unwrap_or(0);
    let nn = ((entropy >> 17) % 100) as u8;
    encode_seed_code(compose_seed(wi, nn))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn decoded_seed_encodes_back_to_code() {
        let seed = decode_seed_code("AX-CAPTION42").unwrap();
        assert_eq!(encode_seed_code(seed), "AX-CAPTION42");
    }

    #[test]
    fn decoding_ignores_case_and_whitespace() {
        assert_eq!(
            decode_seed_code("  ax-braille07 "),
            decode_seed_code("AX-BRAILLE07")
        );
    }

    #[test]
    fn rejects_foreign_or_malformed_codes() {
        assert!(decode_seed_code("CL-ORANGE42").is_none());
        assert!(decode_seed_code("AX-NOTAWORD11").is_none());
        assert!(decode_seed_code("AX-ZOOMxx").is_none());
        assert!(decode_seed_code("AX-1").is_none());
        assert!(decode_seed_code("CAPTION42").is_none());
    }

    #[test]
    fn generated_codes_decode() {
        for entropy in [0_u64, 1, 0xDEAD_BEEF, u64::MAX] {
            let code = generate_seed_code(entropy);
            let seed = decode_seed_code(&code).unwrap();
            assert_eq!(encode_seed_code(seed), code);
        }
    }

    #[test]
    fn replay_code_only_for_seeds_a_code_reproduces() {
        assert_eq!(replay_code(1337), None);
        assert_eq!(replay_code(0), None);
        let seed = decode_seed_code("AX-BRAILLE07").unwrap();
        assert_eq!(replay_code(seed).as_deref(), Some("AX-BRAILLE07"));

        let mut x = 0x9E37_79B9_7F4A_7C15_u64;
        for _ in 0..500 {
            x = x.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            if let Some(code) = replay_code(x) {
                assert_eq!(decode_seed_code(&code), Some(x));
            }
        }
    }

    #[test]
    fn word_list_is_unique() {
        let words: HashSet<_> = WORD_LIST.iter().map(|w| sanitize_word(w)).collect();
        assert_eq!(words.len(), WORD_LIST.len());
    }
}
