use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::Document;
use crate::ops::{ApplyError, Transaction, apply_op_to};
use crate::range::Selection;
use crate::serde_value::DocumentValue;

pub const DEFAULT_LINK_TAG: &str = "a";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AreaConfig {
    #[serde(default)]
    pub read_only: bool,
    /// Tag of link elements; empty means `a`.
    #[serde(default)]
    pub link_tag: String,
    #[serde(default)]
    pub max_ops_per_transaction: usize,
}

impl AreaConfig {
    pub fn with_defaults(mut self) -> Self {
        if self.link_tag.is_empty() {
            self.link_tag = DEFAULT_LINK_TAG.to_string();
        }
        if self.max_ops_per_transaction == 0 {
            self.max_ops_per_transaction = 10_000;
        }
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(s).map(Self::with_defaults)
    }
}

/// Editor state the executables read and edit: the loaded document, the
/// current selection and whether editing is allowed.
#[derive(Debug, Clone)]
pub struct RichTextArea {
    doc: Option<Document>,
    selection: Selection,
    config: AreaConfig,
}

impl RichTextArea {
    pub fn new(doc: Document, selection: Selection) -> Self {
        Self::with_config(doc, selection, AreaConfig::default())
    }

    pub fn with_config(doc: Document, selection: Selection, config: AreaConfig) -> Self {
        Self {
            doc: Some(doc),
            selection,
            config: config.with_defaults(),
        }
    }

    /// An area whose document has not been loaded yet.
    pub fn unloaded() -> Self {
        Self {
            doc: None,
            selection: Selection::default(),
            config: AreaConfig::default().with_defaults(),
        }
    }

    pub fn from_value(value: DocumentValue, selection: Selection) -> Self {
        Self::new(value.into_document(), selection)
    }

    pub fn load(&mut self, doc: Document, selection: Selection) {
        self.doc = Some(doc);
        self.selection = selection;
    }

    pub fn document(&self) -> Option<&Document> {
        self.doc.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    pub fn config(&self) -> &AreaConfig {
        &self.config
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.config.read_only = read_only;
    }

    pub fn is_editable(&self) -> bool {
        self.doc.is_some() && !self.config.read_only
    }

    /// Applies every op of `tx` or none of them.
    pub fn apply(&mut self, tx: Transaction) -> Result<(), ApplyError> {
        let Some(current) = self.doc.as_ref() else {
            return Err(ApplyError::InvalidPath("No document loaded".into()));
        };
        let limit = self.config.max_ops_per_transaction;
        if tx.ops.len() > limit {
            return Err(ApplyError::TooManyOps {
                limit,
                got: tx.ops.len(),
            });
        }

        trace!(
            ops = tx.ops.len(),
            source = tx.meta.source.as_deref().unwrap_or("unknown"),
            "applying transaction"
        );

        let mut doc = current.clone();
        let mut selection = self.selection.clone();
        for op in tx.ops {
            apply_op_to(&mut doc, &mut selection, op)?;
        }
        if let Some(sel) = tx.selection_after {
            selection = sel;
        }

        self.doc = Some(doc);
        self.selection = selection;
        Ok(())
    }
}
