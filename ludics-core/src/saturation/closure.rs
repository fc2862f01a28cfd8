//! Closure conditions on a path set

use crate::path::Path;
use crate::ve::PathIndex;

/// Every positive-ended prefix of every path is itself in the set
pub fn is_prefix_closed(paths: &[Path]) -> bool {
    let index = PathIndex::new(paths);
    paths
        .iter()
        .flat_map(Path::positive_ended_prefixes)
        .all(|prefix| index.contains(&prefix))
}

/// `w·κ⁺ ∈ S ⇒ w·z ∈ S`, the daimon sitting at the locus of `κ⁺`
pub fn is_daimon_closed(paths: &[Path]) -> bool {
    let index = PathIndex::new(paths);
    paths
        .iter()
        .filter(|p| p.ends_positive())
        .filter_map(Path::with_daimon_tail)
        .all(|z| index.contains(&z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::act::Act;
    use crate::locus::LocusPath;

    fn lp(s: &str) -> LocusPath {
        LocusPath::parse(s).unwrap()
    }

    fn a() -> Path {
        Path::new(vec![Act::positive(lp("0"), "1")])
    }

    fn b() -> Path {
        a().extended(Act::negative(lp("0.1"), "a"))
            .extended(Act::positive(lp("0.1.a"), "x"))
    }

    #[test]
    fn test_empty_set_is_closed() {
        assert!(is_prefix_closed(&[]));
        assert!(is_daimon_closed(&[]));
    }

    #[test]
    fn test_prefix_closure() {
        assert!(!is_prefix_closed(&[b()]));
        assert!(is_prefix_closed(&[a(), b()]));
        // negative-ended prefixes are not required
        assert!(is_prefix_closed(&[b().init(), a()]));
    }

    #[test]
    fn test_daimon_closure() {
        let z0 = Path::new(vec![Act::daimon(lp("0"))]);
        assert!(!is_daimon_closed(&[a()]));
        assert!(is_daimon_closed(&[a(), z0.clone()]));

        // daimon must sit at the replaced act's locus
        let misplaced = b().init().extended(Act::daimon(lp("0.1")));
        assert!(!is_daimon_closed(&[a(), z0.clone(), b(), misplaced]));
        let placed = b().with_daimon_tail().unwrap();
        assert!(is_daimon_closed(&[a(), z0, b(), placed]));
    }
}
