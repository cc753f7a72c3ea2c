//! Constraint canonicalization
//!
//! A resolved type accumulates every constraint declared along its parent
//! chain. Three passes reduce that list to an equivalent minimal one:
//!
//! 1. range dominance: a range containing another present range is dropped
//! 2. for discrete types (a single-value set or enumeration present), a range
//!    equal to the base kind's natural range is dropped
//! 3. size dominance: pass 1 applied to size constraints
//!
//! Each pass only filters, so the relative order of survivors is preserved,
//! and each pass is idempotent. Range, size and single-value constraints
//! never interact.

use crate::model::{BaseKind, ConstraintNode};

/// Run the three passes in order
pub fn canonicalize(
    base: BaseKind,
    constraints: &[ConstraintNode],
    has_enums: bool,
) -> Vec<ConstraintNode> {
    let ranges_reduced = drop_dominating_ranges(constraints);
    let discrete_reduced = drop_inherited_full_range(base, &ranges_reduced, has_enums);
    drop_dominating_sizes(&discrete_reduced)
}

/// Pass 1: keep the tightest ranges
///
/// R1 dominates R2 when `R1.min <= R2.min`, `R1.max >= R2.max` and the two
/// differ. Every range dominating another is removed; of identical ranges
/// only the first is kept. Ranges that merely overlap both survive.
pub fn drop_dominating_ranges(constraints: &[ConstraintNode]) -> Vec<ConstraintNode> {
    drop_dominating(constraints, ConstraintNode::as_range)
}

/// Pass 2: drop the primitive's natural range from discrete types
///
/// Only a range identical to `base`'s own natural range is removed; a range
/// inherited from an intermediate ancestor is a real restriction and stays.
pub fn drop_inherited_full_range(
    base: BaseKind,
    constraints: &[ConstraintNode],
    has_enums: bool,
) -> Vec<ConstraintNode> {
    let discrete = has_enums || constraints.iter().any(ConstraintNode::is_single_value);
    let natural = base.natural_range();
    if !discrete || natural.is_none() {
        return constraints.to_vec();
    }
    constraints
        .iter()
        .filter(|c| c.as_range() != natural)
        .cloned()
        .collect()
}

/// Pass 3: keep the tightest sizes
pub fn drop_dominating_sizes(constraints: &[ConstraintNode]) -> Vec<ConstraintNode> {
    drop_dominating(constraints, ConstraintNode::as_size)
}

fn drop_dominating(
    constraints: &[ConstraintNode],
    bounds: fn(&ConstraintNode) -> Option<(i128, i128)>,
) -> Vec<ConstraintNode> {
    let present: Vec<(i128, i128)> = constraints.iter().filter_map(bounds).collect();
    let dominates = |outer: (i128, i128), inner: (i128, i128)| {
        outer != inner && outer.0 <= inner.0 && outer.1 >= inner.1
    };

    let mut kept: Vec<(i128, i128)> = Vec::new();
    let mut out = Vec::with_capacity(constraints.len());
    for c in constraints {
        match bounds(c) {
            None => out.push(c.clone()),
            Some(b) => {
                if present.iter().any(|other| dominates(b, *other)) || kept.contains(&b) {
                    tracing::trace!(constraint = %c, "dropping dominated constraint");
                    continue;
                }
                kept.push(b);
                out.push(c.clone());
            }
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const I32_MIN: i64 = -2147483648;
    const I32_MAX: i64 = 2147483647;

    #[test]
    fn test_full_range_yields_to_nonnegative() {
        let input = [
            ConstraintNode::range(I32_MIN, I32_MAX),
            ConstraintNode::range(0, I32_MAX),
        ];
        assert_eq!(
            canonicalize(BaseKind::Integer32, &input, false),
            vec![ConstraintNode::range(0, I32_MAX)]
        );
    }

    #[test]
    fn test_tightest_of_nested_ranges() {
        let input = [
            ConstraintNode::range(0, I32_MAX),
            ConstraintNode::range(1, I32_MAX),
        ];
        assert_eq!(
            canonicalize(BaseKind::Integer32, &input, false),
            vec![ConstraintNode::range(1, I32_MAX)]
        );
    }

    #[test]
    fn test_single_value_drops_natural_range() {
        let input = [
            ConstraintNode::range(I32_MIN, I32_MAX),
            ConstraintNode::single([7]),
        ];
        assert_eq!(
            canonicalize(BaseKind::Integer32, &input, false),
            vec![ConstraintNode::single([7])]
        );
    }

    #[test]
    fn test_lone_range_without_discrete_values_kept() {
        let input = [ConstraintNode::range(0, I32_MAX)];
        assert_eq!(
            canonicalize(BaseKind::Integer32, &input, false),
            input.to_vec()
        );
    }

    #[test]
    fn test_enums_drop_natural_range() {
        let input = [ConstraintNode::range(I32_MIN, I32_MAX)];
        assert!(canonicalize(BaseKind::Integer32, &input, true).is_empty());
    }

    #[test]
    fn test_intermediate_ancestor_range_survives_pass_two() {
        let input = [
            ConstraintNode::range(I32_MIN, I32_MAX),
            ConstraintNode::range(0, 100),
            ConstraintNode::single([5, 10]),
        ];
        assert_eq!(
            canonicalize(BaseKind::Integer32, &input, false),
            vec![ConstraintNode::range(0, 100), ConstraintNode::single([5, 10])]
        );
    }

    #[test]
    fn test_overlapping_ranges_both_survive() {
        let input = [ConstraintNode::range(0, 10), ConstraintNode::range(5, 20)];
        assert_eq!(drop_dominating_ranges(&input), input.to_vec());
    }

    #[test]
    fn test_duplicates_collapse_to_first() {
        let input = [
            ConstraintNode::size(0, 255),
            ConstraintNode::range(1, 2),
            ConstraintNode::size(0, 255),
        ];
        assert_eq!(
            drop_dominating_sizes(&input),
            vec![ConstraintNode::size(0, 255), ConstraintNode::range(1, 2)]
        );
    }

    #[test]
    fn test_kinds_do_not_interact() {
        let input = [
            ConstraintNode::size(0, 65535),
            ConstraintNode::range(0, 65535),
            ConstraintNode::size(6, 6),
        ];
        assert_eq!(
            canonicalize(BaseKind::OctetString, &input, false),
            vec![ConstraintNode::range(0, 65535), ConstraintNode::size(6, 6)]
        );
    }

    #[test]
    fn test_counter64_natural_range_recognised() {
        let input = [
            ConstraintNode::range(0, u64::MAX),
            ConstraintNode::single([0, 1]),
        ];
        assert_eq!(
            drop_inherited_full_range(BaseKind::Counter64, &input, false),
            vec![ConstraintNode::single([0, 1])]
        );
    }
}
