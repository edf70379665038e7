//! The incremental structure host.
//!
//! [`SourceStructure`] owns the current node tree, a [`StructureParser`] and
//! the bookkeeping that ties them together. Editors report text mutations
//! through [`text_inserted`](SourceStructure::text_inserted),
//! [`text_removed`](SourceStructure::text_removed) or
//! [`apply_edit`](SourceStructure::apply_edit); the host first tries to patch
//! node positions arithmetically and falls back to a full reparse only when
//! the reconciler reports that structure may have changed.
//!
//! Reparsing can run inline or on another thread. The inline path is the
//! default; the threaded path hands out a [`ReparseTicket`] so results that
//! raced with newer edits are discarded instead of installing a tree that no
//! longer matches the document.

use crate::edit::TextEdit;
use crate::kind::NodeKind;
use crate::node::{NodeSpan, SpanNode};
use crate::outline::Outline;
use crate::parse::StructureParser;
use crate::reconcile::{Reconciliation, apply_insertion, apply_removal};

/// How the structure model was brought up to date by the last operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// The first successful parse populated an empty host.
    Initial,
    /// Node positions were patched arithmetically; no parse ran.
    Incremental,
    /// The edit forced a full reparse and a fresh tree was installed.
    FullReparse,
    /// The parser failed; the previous tree is retained and marked stale.
    ParseFailed,
    /// A reparse was needed but deferred by policy; the tree is stale.
    Deferred,
    /// Nothing to do: an empty edit, or a stale background result.
    Skipped,
}

/// When to run a reparse that an edit made necessary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReparsePolicy {
    /// Reparse inline before the edit call returns.
    Immediate,
    /// Mark the tree stale and let the caller schedule the reparse, typically
    /// through [`SourceStructure::begin_reparse`].
    Deferred,
}

/// Behavior switches for a [`SourceStructure`].
#[derive(Debug, Clone)]
pub struct StructureConfig {
    reparse_policy: ReparsePolicy,
}

impl StructureConfig {
    /// Default configuration: immediate reparses.
    pub fn new() -> Self {
        Self {
            reparse_policy: ReparsePolicy::Immediate,
        }
    }

    /// Set the reparse policy.
    pub fn with_reparse_policy(mut self, policy: ReparsePolicy) -> Self {
        self.reparse_policy = policy;
        self
    }

    /// The configured reparse policy.
    pub fn reparse_policy(&self) -> ReparsePolicy {
        self.reparse_policy
    }
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Claim ticket for a reparse running outside the edit path.
///
/// The ticket captures the document version the reparse was started against.
/// [`SourceStructure::complete_reparse`] installs the result only if no edit
/// has bumped the version since.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReparseTicket {
    version: u64,
}

impl ReparseTicket {
    /// The document version this ticket was issued for.
    pub fn version(&self) -> u64 {
        self.version
    }
}

/// Incremental structure model of one document.
///
/// Queries keep answering from the previous tree while it is stale (after a
/// parse failure or under a deferred policy); staleness is observable through
/// [`needs_reparse`](SourceStructure::needs_reparse).
pub struct SourceStructure<P: StructureParser> {
    parser: P,
    config: StructureConfig,
    root: Option<SpanNode>,
    stale: bool,
    version: u64,
    last_update_mode: UpdateMode,
    last_parse_error: Option<P::Error>,
}

impl<P: StructureParser> SourceStructure<P> {
    /// Create a host with the default configuration and no tree.
    pub fn new(parser: P) -> Self {
        Self::with_config(parser, StructureConfig::new())
    }

    /// Create a host with an explicit configuration.
    pub fn with_config(parser: P, config: StructureConfig) -> Self {
        Self {
            parser,
            config,
            root: None,
            stale: false,
            version: 0,
            last_update_mode: UpdateMode::Skipped,
            last_parse_error: None,
        }
    }

    /// The parser collaborator.
    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Mutable access to the parser collaborator.
    pub fn parser_mut(&mut self) -> &mut P {
        &mut self.parser
    }

    /// The active configuration.
    pub fn config(&self) -> &StructureConfig {
        &self.config
    }

    /// The current tree root, if any parse has succeeded.
    pub fn root(&self) -> Option<&SpanNode> {
        self.root.as_ref()
    }

    /// Returns `true` once a tree has been installed.
    pub fn has_model(&self) -> bool {
        self.root.is_some()
    }

    /// Returns `true` if the tree is missing or stale.
    pub fn needs_reparse(&self) -> bool {
        self.root.is_none() || self.stale
    }

    /// Document version, bumped by every non-empty edit.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// How the most recent operation updated the model.
    pub fn last_update_mode(&self) -> UpdateMode {
        self.last_update_mode
    }

    /// The error from the most recent failed parse, until one succeeds.
    pub fn last_parse_error(&self) -> Option<&P::Error> {
        self.last_parse_error.as_ref()
    }

    /// Report an insertion of `text` at character offset `offset`.
    ///
    /// `document` is the full text after the edit, used if a reparse is
    /// needed. Returns how the model was updated.
    pub fn text_inserted(&mut self, offset: usize, text: &str, document: &str) -> UpdateMode {
        let len = text.chars().count();
        if len == 0 {
            self.last_update_mode = UpdateMode::Skipped;
            return UpdateMode::Skipped;
        }
        self.version += 1;
        if self.needs_reparse() {
            return self.resolve(Reconciliation::ReparseNeeded, document);
        }
        let outcome = self.patch_insertion(offset, len);
        self.resolve(outcome, document)
    }

    /// Report a removal of `text` at character offset `offset`.
    ///
    /// `document` is the full text after the edit.
    pub fn text_removed(&mut self, offset: usize, text: &str, document: &str) -> UpdateMode {
        let len = text.chars().count();
        if len == 0 {
            self.last_update_mode = UpdateMode::Skipped;
            return UpdateMode::Skipped;
        }
        self.version += 1;
        if self.needs_reparse() {
            return self.resolve(Reconciliation::ReparseNeeded, document);
        }
        let outcome = self.patch_removal(offset, len);
        self.resolve(outcome, document)
    }

    /// Report one [`TextEdit`], which may both remove and insert text.
    ///
    /// The removal is reconciled before the insertion, and at most one
    /// reparse runs even if both halves report problems. `document` is the
    /// full text after the edit.
    pub fn apply_edit(&mut self, edit: &TextEdit, document: &str) -> UpdateMode {
        if edit.is_empty() {
            self.last_update_mode = UpdateMode::Skipped;
            return UpdateMode::Skipped;
        }
        self.version += 1;
        if self.needs_reparse() {
            return self.resolve(Reconciliation::ReparseNeeded, document);
        }

        let removed = edit.deleted_len();
        let inserted = edit.inserted_len();
        let mut outcome = Reconciliation::Patched;
        if removed > 0 {
            outcome = self.patch_removal(edit.start, removed);
        }
        if outcome == Reconciliation::Patched && inserted > 0 {
            outcome = self.patch_insertion(edit.start, inserted);
        }
        self.resolve(outcome, document)
    }

    /// Parse `document` now and install the result.
    ///
    /// Does not bump the version; reparsing reflects text the host has
    /// already been told about. On failure the previous tree stays in place.
    pub fn reparse(&mut self, document: &str) -> UpdateMode {
        let result = self.parser.parse(document);
        self.install(result)
    }

    /// Drop the current tree so the next edit or reparse starts fresh.
    pub fn invalidate(&mut self) {
        self.root = None;
        self.stale = false;
    }

    /// Issue a ticket for a reparse that will run outside the edit path.
    pub fn begin_reparse(&self) -> ReparseTicket {
        ReparseTicket {
            version: self.version,
        }
    }

    /// Install the result of a ticketed reparse.
    ///
    /// If any edit arrived after the ticket was issued the result is stale
    /// and discarded with [`UpdateMode::Skipped`]; the caller should start a
    /// new reparse against the current text.
    pub fn complete_reparse(
        &mut self,
        ticket: ReparseTicket,
        result: Result<SpanNode, P::Error>,
    ) -> UpdateMode {
        if ticket.version != self.version {
            self.last_update_mode = UpdateMode::Skipped;
            return UpdateMode::Skipped;
        }
        self.install(result)
    }

    /// The deepest node whose span contains `offset`.
    ///
    /// Falls back to the root when no child contains the offset. Returns
    /// `None` with no tree or when `offset` is outside the document span.
    pub fn node_at(&self, offset: usize) -> Option<NodeSpan<'_>> {
        let root = self.root.as_ref()?;
        let root_span = NodeSpan::new(root, 0);
        if !root_span.contains(offset) {
            return None;
        }
        let mut current = root_span;
        loop {
            match current.node().children().find_node(offset, current.start()) {
                Some(child) => current = child,
                None => return Some(current),
            }
        }
    }

    /// The chain of nodes containing `offset`, outermost (root) first.
    pub fn path_to(&self, offset: usize) -> Vec<NodeSpan<'_>> {
        let mut path = Vec::new();
        let Some(root) = self.root.as_ref() else {
            return path;
        };
        let root_span = NodeSpan::new(root, 0);
        if !root_span.contains(offset) {
            return path;
        }
        let mut current = root_span;
        path.push(current);
        while let Some(child) = current.node().children().find_node(offset, current.start()) {
            path.push(child);
            current = child;
        }
        path
    }

    /// The kind of the deepest node containing `offset`.
    pub fn kind_at(&self, offset: usize) -> Option<NodeKind> {
        self.node_at(offset).map(|span| span.kind())
    }

    /// Flatten the current tree into an [`Outline`].
    pub fn outline(&self) -> Outline {
        self.root.as_ref().map(Outline::from_root).unwrap_or_default()
    }

    fn patch_insertion(&mut self, offset: usize, len: usize) -> Reconciliation {
        let Some(root) = self.root.as_mut() else {
            return Reconciliation::ReparseNeeded;
        };
        // An offset past the root span means the host and the document have
        // diverged; repair by reparsing rather than guessing.
        if offset > root.size() {
            return Reconciliation::ReparseNeeded;
        }
        root.grow(len);
        apply_insertion(root, 0, offset, len)
    }

    fn patch_removal(&mut self, start: usize, len: usize) -> Reconciliation {
        let Some(root) = self.root.as_mut() else {
            return Reconciliation::ReparseNeeded;
        };
        if start.saturating_add(len) > root.size() {
            return Reconciliation::ReparseNeeded;
        }
        if root.try_shrink(len).is_err() {
            return Reconciliation::ReparseNeeded;
        }
        apply_removal(root, 0, start, len)
    }

    fn resolve(&mut self, outcome: Reconciliation, document: &str) -> UpdateMode {
        let mode = match outcome {
            Reconciliation::Patched => UpdateMode::Incremental,
            Reconciliation::ReparseNeeded => match self.config.reparse_policy {
                ReparsePolicy::Immediate => return self.reparse(document),
                ReparsePolicy::Deferred => {
                    self.stale = true;
                    UpdateMode::Deferred
                }
            },
        };
        self.last_update_mode = mode;
        mode
    }

    fn install(&mut self, result: Result<SpanNode, P::Error>) -> UpdateMode {
        let had_model = self.root.is_some();
        let mode = match result {
            Ok(root) => {
                self.root = Some(root);
                self.stale = false;
                self.last_parse_error = None;
                if had_model {
                    UpdateMode::FullReparse
                } else {
                    UpdateMode::Initial
                }
            }
            Err(err) => {
                self.stale = true;
                self.last_parse_error = Some(err);
                UpdateMode::ParseFailed
            }
        };
        self.last_update_mode = mode;
        mode
    }
}
