//! Builder staging a new design with its loci and acts

use super::{ActKind, ActMeta, ActRecord, Design, DesignMeta, DesignStore, StoreError, WriteBatch};
use crate::act::Polarity;
use crate::locus::LocusPath;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct DraftAct {
    polarity: Polarity,
    locus: Option<String>,
    ramification: Vec<String>,
    expression: String,
}

/// A design to be created, as compiled moves would describe it
#[derive(Debug, Clone)]
pub struct DesignDraft {
    id: Option<String>,
    dialogue_id: String,
    participant_id: String,
    root: String,
    scope: Option<String>,
    acts: Vec<DraftAct>,
}

impl DesignDraft {
    pub fn new(dialogue_id: impl Into<String>, participant_id: impl Into<String>) -> Self {
        Self {
            id: None,
            dialogue_id: dialogue_id.into(),
            participant_id: participant_id.into(),
            root: crate::locus::ROOT.to_string(),
            scope: None,
            acts: Vec::new(),
        }
    }

    /// Fixed id instead of a fresh uuid
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn root(mut self, path: impl Into<String>) -> Self {
        self.root = path.into();
        self
    }

    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn positive(self, locus: &str, ramification: &[&str]) -> Self {
        self.proper(Polarity::Positive, locus, ramification, "")
    }

    pub fn negative(self, locus: &str, ramification: &[&str]) -> Self {
        self.proper(Polarity::Negative, locus, ramification, "")
    }

    pub fn proper(mut self, polarity: Polarity, locus: &str, ramification: &[&str], expression: &str) -> Self {
        self.acts.push(DraftAct {
            polarity,
            locus: Some(locus.to_string()),
            ramification: ramification.iter().map(|r| r.to_string()).collect(),
            expression: expression.to_string(),
        });
        self
    }

    /// Daimon with no locus, as the move compiler emits it
    pub fn daimon(mut self) -> Self {
        self.acts.push(DraftAct {
            polarity: Polarity::Daimon,
            locus: None,
            ramification: Vec::new(),
            expression: "END".to_string(),
        });
        self
    }

    /// Stage the design, its loci and acts against `store`
    pub fn stage<S: DesignStore + ?Sized>(&self, store: &S) -> Result<WriteBatch, StoreError> {
        let parse = |raw: &str| LocusPath::parse(raw).map_err(|e| StoreError::Invalid(e.to_string()));
        let mut batch = WriteBatch::new();
        let design_id = self.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
        if store.design(&design_id)?.is_some() {
            return Err(StoreError::Conflict(format!("design id {design_id}")));
        }

        let root_locus_id = batch.ensure_locus(store, &self.dialogue_id, &parse(&self.root)?)?;
        batch.designs.push(Design {
            id: design_id.clone(),
            dialogue_id: self.dialogue_id.clone(),
            participant_id: self.participant_id.clone(),
            root_locus_id,
            scope: self.scope.clone(),
            meta: DesignMeta::default(),
        });

        for (order, act) in self.acts.iter().enumerate() {
            let locus_id = match &act.locus {
                Some(raw) => Some(batch.ensure_locus(store, &self.dialogue_id, &parse(raw)?)?),
                None => None,
            };
            let kind = if act.polarity == Polarity::Daimon {
                ActKind::Daimon
            } else {
                ActKind::Proper
            };
            batch.acts.push(ActRecord {
                id: Uuid::new_v4().to_string(),
                design_id: design_id.clone(),
                kind,
                polarity: act.polarity,
                expression: act.expression.clone(),
                locus_id,
                ramification: act.ramification.clone(),
                order_in_design: act_order(order)?,
                meta: ActMeta::default(),
            });
        }
        Ok(batch)
    }
}

fn act_order(index: usize) -> Result<u32, StoreError> {
    u32::try_from(index).map_err(|_| StoreError::Invalid(format!("act order {index} exceeds u32")))
}
