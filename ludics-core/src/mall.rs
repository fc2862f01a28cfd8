//! MALL connectives at the VE layer
//!
//! ⊕ is a deduplicated union, ⊗ interleaves alien paths, and the duals
//! (&, ⅋) are obtained by de Morgan through [`dual_path`]. Inputs need not
//! be ludicable; callers re-check results they intend to keep.
//!
//! ⊗ emits `C(|p|+|q|, |p|)` interleavings per alien pair, so its output
//! grows combinatorially with path length.

use crate::act::Act;
use crate::path::Path;
use crate::ve::Ve;

/// Flip Positive/Negative on every act, keep daimons; its own inverse
pub fn dual_path(p: &Path) -> Path {
    p.dual()
}

fn dual_ve(ve: &Ve) -> Ve {
    ve.dual()
}

/// ⊕ is additive disjunction: union of both path sets
pub fn ve_plus(a: &Ve, b: &Ve) -> Ve {
    Ve::new(a.base.clone(), a.paths().iter().chain(b.paths()).cloned())
}

/// & is additive conjunction: `(A⊥ ⊕ B⊥)⊥`
pub fn ve_with(a: &Ve, b: &Ve) -> Ve {
    dual_ve(&ve_plus(&dual_ve(a), &dual_ve(b)))
}

/// ⊗ is every order-preserving interleaving of each alien pair `(p, q)`
pub fn ve_tensor(a: &Ve, b: &Ve) -> Ve {
    let mut out = Vec::new();
    for p in a.paths() {
        for q in b.paths() {
            if is_alien(p, q) {
                interleave(p, q, &mut out);
            }
        }
    }
    Ve::new(a.base.clone(), out)
}

/// ⅋ is `(A⊥ ⊗ B⊥)⊥`
pub fn ve_par(a: &Ve, b: &Ve) -> Ve {
    dual_ve(&ve_tensor(&dual_ve(a), &dual_ve(b)))
}

/// Positive shift: global polarity flip; inverse of [`ve_shift_neg`]
pub fn ve_shift_pos(g: &Ve) -> Ve {
    dual_ve(g)
}

/// Negative shift: global polarity flip; inverse of [`ve_shift_pos`]
pub fn ve_shift_neg(g: &Ve) -> Ve {
    dual_ve(g)
}

/// No `(locus, key)` footprint shared between the two paths
pub fn is_alien(p: &Path, q: &Path) -> bool {
    let footprint = p.footprint();
    q.acts().iter().all(|act| !footprint.contains(&act.footprint()))
}

fn interleave(p: &Path, q: &Path, out: &mut Vec<Path>) {
    fn go(p: &Path, q: &Path, i: usize, j: usize, acc: &mut Vec<Act>, out: &mut Vec<Path>) {
        if i == p.len() && j == q.len() {
            out.push(Path::new(acc.clone()));
            return;
        }
        if i < p.len() {
            acc.push(p.acts()[i].clone());
            go(p, q, i + 1, j, acc, out);
            acc.pop();
        }
        if j < q.len() {
            acc.push(q.acts()[j].clone());
            go(p, q, i, j + 1, acc, out);
            acc.pop();
        }
    }
    go(p, q, 0, 0, &mut Vec::with_capacity(p.len() + q.len()), out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locus::LocusPath;

    fn lp(s: &str) -> LocusPath {
        LocusPath::parse(s).unwrap()
    }

    fn ve(paths: Vec<Path>) -> Ve {
        Ve::new(LocusPath::root(), paths)
    }

    fn pos(locus: &str, key: &str) -> Act {
        Act::positive(lp(locus), key)
    }

    fn neg(locus: &str, key: &str) -> Act {
        Act::negative(lp(locus), key)
    }

    #[test]
    fn test_plus_contains_both_and_commutes_on_fingerprint() {
        let a = ve(vec![Path::new(vec![pos("0", "1")]), Path::new(vec![Act::daimon(lp("0"))])]);
        let b = ve(vec![Path::new(vec![pos("0", "2")]), Path::new(vec![Act::daimon(lp("0"))])]);
        let ab = ve_plus(&a, &b);
        assert_eq!(ab.len(), 3);
        assert!(a.paths().iter().chain(b.paths()).all(|p| ab.contains(p)));
        assert_eq!(ab.fingerprint(), ve_plus(&b, &a).fingerprint());
    }

    #[test]
    fn test_with_is_dual_of_plus() {
        let a = ve(vec![Path::new(vec![pos("0", "1"), neg("0.1", "a")])]);
        let b = ve(vec![Path::new(vec![neg("0", "2")])]);
        let w = ve_with(&a, &b);
        assert_eq!(w.len(), 2);
        assert!(w.contains(&a.paths()[0]));
        assert!(w.contains(&b.paths()[0]));
        assert_eq!(w.dual(), ve_plus(&a.dual(), &b.dual()));
    }

    #[test]
    fn test_tensor_interleaves_alien_pairs() {
        let p = Path::new(vec![pos("0", "1"), neg("0.1", "a")]);
        let q = Path::new(vec![pos("0", "2")]);
        let t = ve_tensor(&ve(vec![p.clone()]), &ve(vec![q.clone()]));
        // C(3, 2) interleavings, each preserving per-side order
        assert_eq!(t.len(), 3);
        for path in t.paths() {
            let acts = path.acts();
            let i = acts.iter().position(|x| x == &p.acts()[0]).unwrap();
            let j = acts.iter().position(|x| x == &p.acts()[1]).unwrap();
            assert!(i < j);
            assert!(acts.contains(&q.acts()[0]));
        }
    }

    #[test]
    fn test_tensor_drops_shared_footprints() {
        let p = Path::new(vec![pos("0", "1"), neg("0.1", "a")]);
        let q = Path::new(vec![neg("0", "1")]);
        assert!(!is_alien(&p, &q));
        let t = ve_tensor(&ve(vec![p]), &ve(vec![q]));
        assert!(t.is_empty());
    }

    #[test]
    fn test_par_is_dual_of_tensor() {
        let a = ve(vec![Path::new(vec![neg("0", "1")])]);
        let b = ve(vec![Path::new(vec![neg("0", "2")])]);
        let par = ve_par(&a, &b);
        assert_eq!(par.len(), 2);
        assert_eq!(par.dual(), ve_tensor(&a.dual(), &b.dual()));
    }

    #[test]
    fn test_shifts_are_inverse() {
        let g = ve(vec![
            Path::new(vec![pos("0", "1"), neg("0.1", "a")]),
            Path::new(vec![Act::daimon(lp("0"))]),
        ]);
        assert_eq!(ve_shift_neg(&ve_shift_pos(&g)), g);
        assert_eq!(ve_shift_pos(&ve_shift_neg(&g)), g);
    }

    #[test]
    fn test_constructors_are_deterministic() {
        let a = ve(vec![Path::new(vec![pos("0", "1")]), Path::new(vec![Act::daimon(lp("0"))])]);
        let b = ve(vec![Path::new(vec![pos("0", "2")])]);
        let ops: [fn(&Ve, &Ve) -> Ve; 4] = [ve_plus, ve_with, ve_tensor, ve_par];
        for op in ops {
            assert_eq!(op(&a, &b).fingerprint(), op(&a, &b).fingerprint());
        }
    }

    #[test]
    fn test_dual_path_fixes_daimon() {
        let p = Path::new(vec![pos("0", "1"), Act::daimon(lp("0.1"))]);
        assert_eq!(dual_path(&dual_path(&p)), p);
        assert!(dual_path(&p).ends_daimon());
    }
}
