//! Fax: import a filtered slice of one design into another

use super::{load_design, locus_path, CancelToken, ComposeError};
use crate::act::Polarity;
use crate::locus::LocusPath;
use crate::store::{ActKind, ActMeta, ActRecord, DesignStore, FaxOrigin, WriteBatch};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which source acts to import; `None` fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaxFilter {
    #[serde(default)]
    pub kind: Option<ActKind>,
    #[serde(default)]
    pub polarity: Option<Polarity>,
    /// Deepest source locus to keep, counted from the root (`0.1` is 1)
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl FaxFilter {
    fn accepts(&self, act: &ActRecord, path: Option<&LocusPath>) -> bool {
        self.kind.map_or(true, |k| k == act.kind)
            && self.polarity.map_or(true, |p| p == act.polarity)
            && self
                .max_depth
                .map_or(true, |max| path.map_or(0, LocusPath::depth) <= max)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaxResult {
    pub faxed_count: usize,
    pub act_ids: Vec<String>,
}

/// Copy the acts of `source_id` accepted by `filter` into `target_id`,
/// with each locus re-rooted at `target_locus` (`0.1.2` onto `0.99` gives
/// `0.99.1.2`). New acts follow the target's existing ones in order.
///
/// Calling it again imports a fresh copy; nothing is deduplicated.
pub fn fax_from_scope<S: DesignStore + ?Sized>(
    store: &mut S,
    source_id: &str,
    target_id: &str,
    target_locus: &LocusPath,
    filter: &FaxFilter,
    cancel: &CancelToken,
) -> Result<FaxResult, ComposeError> {
    let source = load_design(&*store, source_id)?;
    let target = load_design(&*store, target_id)?;
    if source.dialogue_id != target.dialogue_id {
        return Err(ComposeError::ScopeMismatch {
            left: source.id,
            right: target.id,
            detail: format!("dialogues {} and {} differ", source.dialogue_id, target.dialogue_id),
        });
    }

    let mut next_order = store
        .acts(&target.id)?
        .iter()
        .map(|a| a.order_in_design + 1)
        .max()
        .unwrap_or(0);

    let mut batch = WriteBatch::new();
    let mut act_ids = Vec::new();
    for act in store.acts(&source.id)? {
        let original = match act.locus_id.as_deref() {
            Some(id) => Some(locus_path(&*store, &source, id)?),
            None => None,
        };
        if !filter.accepts(&act, original.as_ref()) {
            continue;
        }
        let locus_id = match &original {
            Some(path) => Some(batch.ensure_locus(&*store, &target.dialogue_id, &path.rebased(target_locus))?),
            None => None,
        };
        let id = Uuid::new_v4().to_string();
        batch.acts.push(ActRecord {
            id: id.clone(),
            design_id: target.id.clone(),
            kind: act.kind,
            polarity: act.polarity,
            expression: act.expression,
            locus_id,
            ramification: act.ramification,
            order_in_design: next_order,
            meta: ActMeta {
                fax: Some(FaxOrigin {
                    from_design_id: source.id.clone(),
                    scope: source.scope.clone(),
                    original_locus: original,
                }),
            },
        });
        act_ids.push(id);
        next_order += 1;
    }

    if act_ids.is_empty() {
        debug!("Fax {} -> {}: nothing matched", source.id, target.id);
        return Ok(FaxResult::default());
    }
    cancel.check()?;
    store.commit(batch)?;
    info!(
        "Faxed {} acts from {} into {} at {}",
        act_ids.len(),
        source.id,
        target.id,
        target_locus
    );
    Ok(FaxResult {
        faxed_count: act_ids.len(),
        act_ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{DesignDraft, MemoryStore};

    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::new();
        let source = DesignDraft::new("dlg", "Proponent")
            .id("S")
            .scope("topic:a")
            .positive("0", &["1", "2"])
            .negative("0.1", &["a"])
            .positive("0.1.a", &["x"])
            .daimon()
            .stage(&store)
            .unwrap();
        store.commit(source).unwrap();
        let target = DesignDraft::new("dlg", "Proponent")
            .id("T")
            .scope("topic:b")
            .positive("0", &["3"])
            .negative("0.3", &[])
            .stage(&store)
            .unwrap();
        store.commit(target).unwrap();
        store
    }

    fn target_locus() -> LocusPath {
        LocusPath::parse("0.99").unwrap()
    }

    #[test]
    fn test_fax_top_level_proper_acts() {
        let mut store = seeded();
        let filter = FaxFilter {
            kind: Some(ActKind::Proper),
            max_depth: Some(1),
            ..FaxFilter::default()
        };
        let result = fax_from_scope(&mut store, "S", "T", &target_locus(), &filter, &CancelToken::new()).unwrap();
        assert_eq!(result.faxed_count, 2);
        assert_eq!(result.act_ids.len(), 2);

        let acts = store.acts("T").unwrap();
        assert_eq!(acts.iter().map(|a| a.order_in_design).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        let faxed = &acts[2..];
        let paths: Vec<String> = faxed
            .iter()
            .map(|a| store.locus(a.locus_id.as_deref().unwrap()).unwrap().unwrap().path.to_string())
            .collect();
        assert_eq!(paths, vec!["0.99", "0.99.1"]);
        assert_eq!(faxed[0].ramification, vec!["1", "2"]);

        let origin = faxed[1].meta.fax.clone().unwrap();
        assert_eq!(origin.from_design_id, "S");
        assert_eq!(origin.scope.as_deref(), Some("topic:a"));
        assert_eq!(origin.original_locus, Some(LocusPath::parse("0.1").unwrap()));
    }

    #[test]
    fn test_fax_is_repeatable() {
        let mut store = seeded();
        let filter = FaxFilter {
            polarity: Some(Polarity::Positive),
            ..FaxFilter::default()
        };
        let first = fax_from_scope(&mut store, "S", "T", &target_locus(), &filter, &CancelToken::new()).unwrap();
        let loci = store.locus_count();
        let second = fax_from_scope(&mut store, "S", "T", &target_locus(), &filter, &CancelToken::new()).unwrap();
        assert_eq!(first.faxed_count, 2);
        assert_eq!(second.faxed_count, 2);
        assert_eq!(store.locus_count(), loci);
        let orders: Vec<u32> = store.acts("T").unwrap().iter().map(|a| a.order_in_design).collect();
        assert_eq!(orders, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_fax_daimon_keeps_no_locus() {
        let mut store = seeded();
        let filter = FaxFilter {
            kind: Some(ActKind::Daimon),
            ..FaxFilter::default()
        };
        let result = fax_from_scope(&mut store, "S", "T", &target_locus(), &filter, &CancelToken::new()).unwrap();
        assert_eq!(result.faxed_count, 1);
        let daimon = store.acts("T").unwrap().pop().unwrap();
        assert_eq!(daimon.kind, ActKind::Daimon);
        assert!(daimon.locus_id.is_none());
        assert_eq!(daimon.expression, "END");
    }

    #[test]
    fn test_empty_selection_commits_nothing() {
        let mut store = seeded();
        let filter = FaxFilter {
            max_depth: Some(0),
            polarity: Some(Polarity::Negative),
            ..FaxFilter::default()
        };
        let acts = store.act_count();
        let result = fax_from_scope(&mut store, "S", "T", &target_locus(), &filter, &CancelToken::new()).unwrap();
        assert_eq!(result, FaxResult::default());
        assert_eq!(store.act_count(), acts);
    }

    #[test]
    fn test_fax_errors() {
        let mut store = seeded();
        let other = DesignDraft::new("elsewhere", "Opponent").id("X").stage(&store).unwrap();
        store.commit(other).unwrap();

        let filter = FaxFilter::default();
        let err = fax_from_scope(&mut store, "S", "X", &target_locus(), &filter, &CancelToken::new()).unwrap_err();
        assert!(matches!(err, ComposeError::ScopeMismatch { .. }));
        let err = fax_from_scope(&mut store, "S", "ghost", &target_locus(), &filter, &CancelToken::new()).unwrap_err();
        assert!(matches!(err, ComposeError::UnknownDesign(_)));

        let token = CancelToken::new();
        token.cancel();
        let acts = store.act_count();
        let err = fax_from_scope(&mut store, "S", "T", &target_locus(), &filter, &token).unwrap_err();
        assert!(matches!(err, ComposeError::Cancelled));
        assert_eq!(store.act_count(), acts);
    }

    #[test]
    fn test_filter_from_json() {
        let filter: FaxFilter = serde_json::from_str(r#"{"kind":"PROPER","maxDepth":1}"#).unwrap();
        assert_eq!(filter.kind, Some(ActKind::Proper));
        assert_eq!(filter.max_depth, Some(1));
        assert_eq!(filter.polarity, None);
    }
}
