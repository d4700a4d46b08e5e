/// Utility functions for text comparison

/// One unit of a prepared search query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QueryUnit {
    /// A case-folded char
    Char(char),
    /// A run of whitespace; matches one or more whitespace chars
    Whitespace,
}

/// Fold a char for case-insensitive comparison.
/// Only one-to-one lowercase mappings are applied so that folded text stays
/// index-aligned with the original.
#[inline(always)]
pub(crate) fn fold_case(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Case-fold a query and collapse its whitespace runs
pub(crate) fn fold_query(query: &str) -> Vec<QueryUnit> {
    let mut units = Vec::with_capacity(query.len());
    for c in query.chars() {
        if c.is_whitespace() {
            if units.last() != Some(&QueryUnit::Whitespace) {
                units.push(QueryUnit::Whitespace);
            }
        } else {
            units.push(QueryUnit::Char(fold_case(c)));
        }
    }
    units
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_fold_case() {
        assert_eq!(fold_case('A'), 'a');
        assert_eq!(fold_case('Ä'), 'ä');
        assert_eq!(fold_case('z'), 'z');
        // lowercases to two chars - left alone to keep indices aligned
        assert_eq!(fold_case('İ'), 'İ');
    }

    #[test]
    fn test_fold_query() {
        assert_eq!(
            fold_query("A  b\tC"),
            vec![
                QueryUnit::Char('a'),
                QueryUnit::Whitespace,
                QueryUnit::Char('b'),
                QueryUnit::Whitespace,
                QueryUnit::Char('c'),
            ]
        );
    }
}
