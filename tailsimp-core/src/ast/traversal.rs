//! Structural queries and variable renaming.
//!
//! All functions here are aware of quantifier scoping: under a quantifier
//! binding `n` variables, `Var(i)` with `i < n` is bound and `Var(i + n)`
//! denotes the free rule variable `i`.

use super::{TermId, TermKind, TermManager};
use rustc_hash::{FxHashMap, FxHashSet};

/// Free variable indices of `t`, in order of first occurrence.
pub fn free_vars(tm: &TermManager, t: TermId) -> Vec<u32> {
    let mut out = Vec::new();
    let mut seen = FxHashSet::default();
    collect_free_vars(tm, t, &mut out, &mut seen);
    out
}

/// Append the free variables of `t` not yet in `seen` to `out`.
///
/// Calling this on several terms in sequence yields the variables of all of
/// them in order of first occurrence.
pub fn collect_free_vars(
    tm: &TermManager,
    t: TermId,
    out: &mut Vec<u32>,
    seen: &mut FxHashSet<u32>,
) {
    let mut visited = FxHashSet::default();
    walk_free_vars(tm, t, 0, out, seen, &mut visited);
}

fn walk_free_vars(
    tm: &TermManager,
    t: TermId,
    offset: u32,
    out: &mut Vec<u32>,
    seen: &mut FxHashSet<u32>,
    visited: &mut FxHashSet<(TermId, u32)>,
) {
    if !visited.insert((t, offset)) {
        return;
    }
    match tm.kind(t) {
        TermKind::Var(idx) => {
            if *idx >= offset && seen.insert(idx - offset) {
                out.push(idx - offset);
            }
        }
        TermKind::Exists { num_bound, body } | TermKind::Forall { num_bound, body } => {
            walk_free_vars(tm, *body, offset + num_bound, out, seen, visited);
        }
        _ => {
            for child in tm.children(t) {
                walk_free_vars(tm, child, offset, out, seen, visited);
            }
        }
    }
}

/// Largest free variable index of `t`, if it has any free variable.
pub fn max_free_var(tm: &TermManager, t: TermId) -> Option<u32> {
    free_vars(tm, t).into_iter().max()
}

/// Does `t` contain a quantifier anywhere?
pub fn contains_quantifier(tm: &TermManager, t: TermId) -> bool {
    let mut stack = vec![t];
    let mut visited = FxHashSet::default();
    while let Some(cur) = stack.pop() {
        if !visited.insert(cur) {
            continue;
        }
        if tm.is_quantifier(cur) {
            return true;
        }
        stack.extend(tm.children(cur));
    }
    false
}

/// Rename the free variables of `t` according to `map`.
///
/// Free variables missing from `map` keep their index.
pub fn rename_vars(tm: &mut TermManager, t: TermId, map: &FxHashMap<u32, u32>) -> TermId {
    let mut cache = FxHashMap::default();
    rename_rec(tm, t, 0, map, &mut cache)
}

fn rename_rec(
    tm: &mut TermManager,
    t: TermId,
    offset: u32,
    map: &FxHashMap<u32, u32>,
    cache: &mut FxHashMap<(TermId, u32), TermId>,
) -> TermId {
    if let Some(&r) = cache.get(&(t, offset)) {
        return r;
    }
    let result = match tm.kind(t).clone() {
        TermKind::Var(idx) if idx >= offset => match map.get(&(idx - offset)) {
            Some(&new_idx) => {
                let sort = tm.sort_of(t);
                tm.mk_var(new_idx + offset, sort)
            }
            None => t,
        },
        TermKind::Var(_) => t,
        TermKind::Exists { num_bound, body } | TermKind::Forall { num_bound, body } => {
            let new_body = rename_rec(tm, body, offset + num_bound, map, cache);
            tm.rebuild(t, &[new_body])
        }
        _ => {
            let children = tm.children(t);
            let new_children: Vec<TermId> = children
                .iter()
                .map(|&c| rename_rec(tm, c, offset, map, cache))
                .collect();
            tm.rebuild(t, &new_children)
        }
    };
    cache.insert((t, offset), result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_vars_order() {
        let mut tm = TermManager::new();
        let int = tm.sorts.int_sort;
        let x2 = tm.mk_var(2, int);
        let x0 = tm.mk_var(0, int);
        let sum = tm.mk_add([x2, x0, x2]);
        let one = tm.mk_int(1);
        let le = tm.mk_le(sum, one);
        assert_eq!(free_vars(&tm, le), vec![2, 0]);
        assert_eq!(max_free_var(&tm, le), Some(2));
        assert_eq!(max_free_var(&tm, one), None);
    }

    #[test]
    fn test_bound_vars_are_skipped() {
        let mut tm = TermManager::new();
        let int = tm.sorts.int_sort;
        let bound = tm.mk_var(0, int);
        let free = tm.mk_var(1, int);
        let body = tm.mk_eq(bound, free);
        let ex = tm.mk_exists(1, body);
        assert_eq!(free_vars(&tm, ex), vec![0]);
        assert!(contains_quantifier(&tm, ex));
        assert!(!contains_quantifier(&tm, body));
    }

    #[test]
    fn test_rename_under_quantifier() {
        let mut tm = TermManager::new();
        let int = tm.sorts.int_sort;
        let bound = tm.mk_var(0, int);
        let free = tm.mk_var(4, int);
        let body = tm.mk_eq(bound, free);
        let ex = tm.mk_exists(1, body);

        let mut map = FxHashMap::default();
        map.insert(3, 0);
        map.insert(0, 7);
        let renamed = rename_vars(&mut tm, ex, &map);

        let new_free = tm.mk_var(1, int);
        let expected_body = tm.mk_eq(bound, new_free);
        assert_eq!(renamed, tm.mk_exists(1, expected_body));
    }

    #[test]
    fn test_rename_unmapped_keeps_index() {
        let mut tm = TermManager::new();
        let int = tm.sorts.int_sort;
        let x = tm.mk_var(0, int);
        let y = tm.mk_var(1, int);
        let lt = tm.mk_lt(x, y);
        let mut map = FxHashMap::default();
        map.insert(1, 0);
        let renamed = rename_vars(&mut tm, lt, &map);
        assert_eq!(renamed, tm.mk_lt(x, x));
    }
}
