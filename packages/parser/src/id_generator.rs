use rand::rngs::OsRng;
use rand::Rng;

/// Length of every generated annotation id
pub const ID_LENGTH: usize = 8;

/// Base62 without the look-alike glyphs `0 O 1 I l`.
///
/// 57^8 is about 1.1e14 ids. Nothing checks for collisions, so shrinking this
/// alphabet or the length changes correctness, not just looks.
pub const ID_ALPHABET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Generate a fresh annotation id from the operating system's CSPRNG
pub fn generate_id() -> String {
    let mut rng = OsRng;
    (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect()
}

/// Whether `id` has the shape produced by [`generate_id`]
pub fn is_generated_id(id: &str) -> bool {
    id.len() == ID_LENGTH && id.bytes().all(|b| ID_ALPHABET.contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_shape() {
        let id = generate_id();
        assert_eq!(id.len(), ID_LENGTH);
        assert!(is_generated_id(&id));
    }

    #[test]
    fn test_ids_do_not_repeat() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_alphabet_has_no_lookalikes() {
        for c in [b'0', b'O', b'1', b'I', b'l'] {
            assert!(!ID_ALPHABET.contains(&c));
        }
        assert_eq!(ID_ALPHABET.len(), 57);
    }

    #[test]
    fn test_foreign_ids_are_not_generated_shape() {
        assert!(!is_generated_id("a1"));
        assert!(!is_generated_id("abc-def_"));
    }
}
