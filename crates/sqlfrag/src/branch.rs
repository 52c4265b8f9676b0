//! The alternation (OR) branch tree.
//!
//! Each call to [`crate::QueryBuilder::or`] attaches the other builder's
//! accumulated state as branch nodes. The tree nests arbitrarily and is only
//! flattened at serialization time.

/// One node of the alternation tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Branch {
    /// A flat AND-group of already-sanitized fragments.
    All(Vec<String>),
    /// A nested alternation carrying the attached builder's own branches.
    Any(Vec<Branch>),
}

impl Branch {
    /// Depth-first, left-to-right flattening.
    ///
    /// An AND-group becomes one `OR a AND b` line; a nested alternation is
    /// inlined as a sibling list of lines in attachment order, never wrapped
    /// in parentheses. Output order is therefore fixed by the sequence of
    /// `or()` calls that built the tree.
    fn flatten_into(&self, out: &mut Vec<String>) {
        match self {
            Branch::All(fragments) => {
                if !fragments.is_empty() {
                    out.push(format!("OR {}", fragments.join(" AND ")));
                }
            }
            Branch::Any(children) => {
                for child in children {
                    child.flatten_into(out);
                }
            }
        }
    }
}

/// Flatten a branch sequence into `OR ...` lines.
pub(crate) fn flatten(branches: &[Branch]) -> Vec<String> {
    let mut out = Vec::new();
    for branch in branches {
        branch.flatten_into(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flat_group_joins_with_and() {
        let lines = flatten(&[Branch::All(frags(&["a = 1", "b = 2"]))]);
        assert_eq!(lines, vec!["OR a = 1 AND b = 2"]);
    }

    #[test]
    fn empty_group_emits_nothing() {
        assert!(flatten(&[Branch::All(Vec::new())]).is_empty());
        assert!(flatten(&[Branch::Any(Vec::new())]).is_empty());
    }

    #[test]
    fn nested_alternation_inlines_as_siblings() {
        let tree = vec![
            Branch::Any(vec![
                Branch::All(frags(&["c = 3"])),
                Branch::Any(vec![Branch::All(frags(&["d = 4"]))]),
            ]),
            Branch::All(frags(&["b = 2"])),
        ];
        assert_eq!(flatten(&tree), vec!["OR c = 3", "OR d = 4", "OR b = 2"]);
    }
}
