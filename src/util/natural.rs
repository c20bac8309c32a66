use std::cmp::Ordering;

/// Natural ("alphanumeric") ordering: digit runs compare as numbers, letters
/// compare case-insensitively, and a string that is a prefix of the other
/// sorts first. `rack2 < rack10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (mut i, mut j) = (0, 0);

    while i < a.len() && j < b.len() {
        if a[i].is_ascii_digit() && b[j].is_ascii_digit() {
            let (si, sj) = (i, j);
            while i < a.len() && a[i].is_ascii_digit() { i += 1; }
            while j < b.len() && b[j].is_ascii_digit() { j += 1; }
            let ord = cmp_digits(&a[si..i], &b[sj..j]);
            if ord != Ordering::Equal { return ord; }
            continue;
        }

        let (x, y) = (a[i].to_ascii_lowercase(), b[j].to_ascii_lowercase());
        if x != y { return x.cmp(&y); }
        i += 1;
        j += 1;
    }

    (a.len() - i).cmp(&(b.len() - j))
}

/// Compare two digit runs by value without overflowing on long runs.
fn cmp_digits(x: &[char], y: &[char]) -> Ordering {
    let strip = |s: &[char]| -> usize { s.iter().take_while(|c| **c == '0').count() };
    let (x, y) = (&x[strip(x)..], &y[strip(y)..]);
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(v: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = v.iter().map(|s| s.to_string()).collect();
        v.sort_by(|a, b| natural_cmp(a, b));
        v
    }

    #[test]
    fn numbers_sort_by_value() {
        assert_eq!(sorted(&["rack2", "rack10", "rack1"]), vec!["rack1", "rack2", "rack10"]);
        assert_eq!(sorted(&["n-10-b", "n-9-z", "n-10-a"]), vec!["n-9-z", "n-10-a", "n-10-b"]);
    }

    #[test]
    fn letters_ignore_case() {
        assert_eq!(natural_cmp("Node", "node"), Ordering::Equal);
        assert_eq!(natural_cmp("alpha", "Beta"), Ordering::Less);
    }

    #[test]
    fn shorter_prefix_wins() {
        assert_eq!(natural_cmp("node", "node1"), Ordering::Less);
        assert_eq!(natural_cmp("", "a"), Ordering::Less);
    }

    #[test]
    fn long_digit_runs_do_not_overflow() {
        assert_eq!(natural_cmp("x99999999999999999999999", "x100000000000000000000000"), Ordering::Less);
        assert_eq!(natural_cmp("x007", "x7"), Ordering::Equal);
    }
}
