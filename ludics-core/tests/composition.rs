use ludics_core::compose::{directory_at, FaxFilter, PreflightNote};
use ludics_core::store::{ActKind, DesignDraft};
use ludics_core::{
    clone_design_with_shift, fax_from_scope, preflight, CancelToken, ComposeError, CompositionMode, DesignStore,
    JsonFileStore, LocusPath, MemoryStore, PreflightOutcome, PreflightRequest,
};
use serde_json::json;

fn overlapping_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    for draft in [
        DesignDraft::new("dlg", "Proponent")
            .id("P")
            .positive("0", &["x", "y"])
            .negative("0.y", &["1"])
            .daimon(),
        DesignDraft::new("dlg", "Opponent")
            .id("O")
            .positive("0", &["x"])
            .negative("0.x", &["2"]),
    ] {
        let batch = draft.stage(&store).unwrap();
        store.commit(batch).unwrap();
    }
    store
}

fn request(pos: &str, neg: &str, mode: CompositionMode) -> PreflightRequest {
    PreflightRequest {
        dialogue_id: "dlg".into(),
        pos_design_id: pos.into(),
        neg_design_id: neg.into(),
        mode,
    }
}

#[test]
fn test_partial_then_spiritual_then_assoc() {
    let mut store = overlapping_store();
    let cancel = CancelToken::new();

    let blocked = preflight(&mut store, &request("P", "O", CompositionMode::Partial), &cancel).unwrap();
    assert_eq!(
        serde_json::to_value(&blocked).unwrap(),
        json!({ "ok": false, "reason": "dir-collision", "collisions": ["x"] })
    );

    let fixed = preflight(&mut store, &request("P", "O", CompositionMode::Spiritual), &cancel).unwrap();
    let value = serde_json::to_value(&fixed).unwrap();
    assert_eq!(value["ok"], true);
    assert_eq!(value["note"], "shift-inserted");
    assert_eq!(value["shifted"], json!({ "posTag": "L", "negTag": "R" }));

    let PreflightOutcome::Ready {
        pos_design_id,
        neg_design_id,
        ..
    } = fixed
    else {
        panic!("spiritual preflight did not succeed");
    };
    let again = preflight(&mut store, &request(&pos_design_id, &neg_design_id, CompositionMode::Assoc), &cancel).unwrap();
    assert!(matches!(again, PreflightOutcome::Ready { note: PreflightNote::Assoc, .. }));

    // delocated copies open their labels under 0.L / 0.R
    let left = directory_at(&store, &pos_design_id, &LocusPath::parse("0.L").unwrap()).unwrap();
    let right = directory_at(&store, &neg_design_id, &LocusPath::parse("0.R").unwrap()).unwrap();
    assert_eq!(left.into_iter().collect::<Vec<_>>(), vec!["x", "y"]);
    assert_eq!(right.into_iter().collect::<Vec<_>>(), vec!["x"]);
}

#[test]
fn test_delocation_rewrites_every_locus() {
    let mut store = overlapping_store();
    let clone = clone_design_with_shift(&mut store, "P", "L", &CancelToken::new()).unwrap();
    let root = store.locus(&clone.root_locus_id).unwrap().unwrap();
    assert_eq!(root.path.as_str(), "0.L");

    let path_of = |id: &Option<String>| {
        id.as_ref()
            .map(|id| store.locus(id).unwrap().unwrap().path.to_string())
    };
    let original: Vec<_> = store.acts("P").unwrap().iter().map(|a| path_of(&a.locus_id)).collect();
    let copied: Vec<_> = store.acts(&clone.id).unwrap().iter().map(|a| path_of(&a.locus_id)).collect();
    assert_eq!(original, vec![Some("0".to_string()), Some("0.y".to_string()), None]);
    assert_eq!(copied, vec![Some("0.L".to_string()), Some("0.L.y".to_string()), None]);
}

#[test]
fn test_input_errors_are_not_collisions() {
    let mut store = overlapping_store();
    let other = DesignDraft::new("other-dialogue", "Opponent").id("X").stage(&store).unwrap();
    store.commit(other).unwrap();

    let err = preflight(&mut store, &request("P", "missing", CompositionMode::Partial), &CancelToken::new()).unwrap_err();
    assert!(matches!(err, ComposeError::UnknownDesign(_)));

    let err = preflight(&mut store, &request("P", "X", CompositionMode::Partial), &CancelToken::new()).unwrap_err();
    assert!(matches!(err, ComposeError::ScopeMismatch { .. }));
    assert!(err.is_input_error());
}

#[test]
fn test_fax_into_persistent_store() {
    let file = std::env::temp_dir()
        .join(format!("ludics-compose-test-{}", uuid::Uuid::new_v4()))
        .join("store.json");
    {
        let mut store = JsonFileStore::open(&file).unwrap();
        for draft in [
            DesignDraft::new("dlg", "Proponent")
                .id("S")
                .scope("topic:a")
                .positive("0", &["1"])
                .negative("0.1", &["a"]),
            DesignDraft::new("dlg", "Proponent").id("T").scope("topic:b"),
        ] {
            let batch = draft.stage(&store).unwrap();
            store.commit(batch).unwrap();
        }
        let filter = FaxFilter {
            kind: Some(ActKind::Proper),
            max_depth: Some(1),
            ..FaxFilter::default()
        };
        let target = LocusPath::parse("0.99").unwrap();
        let result = fax_from_scope(&mut store, "S", "T", &target, &filter, &CancelToken::new()).unwrap();
        assert_eq!(result.faxed_count, 2);
    }

    let reopened = JsonFileStore::open(&file).unwrap();
    let acts = reopened.acts("T").unwrap();
    assert_eq!(acts.len(), 2);
    let origin = acts[1].meta.fax.as_ref().unwrap();
    assert_eq!(origin.from_design_id, "S");
    assert_eq!(origin.original_locus.as_ref().map(|l| l.as_str()), Some("0.1"));
    let locus = reopened.locus(acts[1].locus_id.as_deref().unwrap()).unwrap().unwrap();
    assert_eq!(locus.path.as_str(), "0.99.1");

    let _ = std::fs::remove_dir_all(file.parent().unwrap());
}
