/// Deterministically permutes `items` in place, keyed by `salt`.
///
/// Walks the sequence from the last index down to 1, drawing salt characters
/// round-robin and accumulating their codes to pick each swap partner.  The
/// same `(items, salt)` pair always yields the same permutation.  An empty
/// salt leaves the sequence untouched.
pub(crate) fn consistent_shuffle(items: &mut [char], salt: &[char]) {
    if salt.is_empty() {
        return;
    }

    let mut v = 0usize;
    let mut p = 0usize;
    for i in (1..items.len()).rev() {
        let code = salt[v] as usize;
        p += code;
        let j = (code + v + p) % i;
        items.swap(i, j);
        v = (v + 1) % salt.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_empty_salt_is_identity() {
        let mut items = chars("abcdef");
        consistent_shuffle(&mut items, &[]);
        assert_eq!(items, chars("abcdef"));
    }

    #[test]
    fn test_known_permutation() {
        let mut items = chars("cfhistuCFHISTU");
        consistent_shuffle(&mut items, &chars("testing"));
        assert_eq!(items.iter().collect::<String>(), "suUfiIFchtTHCS");
    }

    #[test]
    fn test_deterministic_and_salt_dependent() {
        let base = chars("abcdefghijklmnopqrstuvwxyz");
        let mut a = base.clone();
        let mut b = base.clone();
        let mut c = base.clone();
        consistent_shuffle(&mut a, &chars("salt"));
        consistent_shuffle(&mut b, &chars("salt"));
        consistent_shuffle(&mut c, &chars("pepper"));
        assert_eq!(a, b);
        assert_ne!(a, c);

        let mut sorted = a.clone();
        sorted.sort();
        assert_eq!(sorted, base);
    }

    #[test]
    fn test_short_sequences() {
        let mut empty: Vec<char> = vec![];
        consistent_shuffle(&mut empty, &chars("salt"));
        assert!(empty.is_empty());

        let mut single = chars("x");
        consistent_shuffle(&mut single, &chars("salt"));
        assert_eq!(single, chars("x"));
    }
}
