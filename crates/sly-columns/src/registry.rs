//! Reference-counted column width registry.
//!
//! # Invariants
//!
//! 1. An entry exists exactly while its `reference_count` is > 0.
//! 2. `max_width_px` never decreases while the entry exists. A key that is
//!    released to zero and reported again starts from the new width.
//! 3. Template tracks follow first-report order of the surviving keys.
//! 4. Subscribers are called only when the derived template differs from
//!    the last published one, in registration order, outside any internal
//!    borrow (callbacks may read the registry).
//! 5. `clear` starts a new generation. References taken in an earlier
//!    generation are void: releasing one never touches a current entry.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rustc_hash::FxHashMap;

use crate::template::{ColumnTemplate, ColumnTrack};

type TemplateCallback = Rc<dyn Fn(&ColumnTemplate)>;
type TemplateCallbackWeak = Weak<dyn Fn(&ColumnTemplate)>;

/// Aggregated state for one column key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnEntry {
    pub key: String,
    pub max_width_px: u32,
    pub reference_count: u32,
}

/// Result of [`ColumnRegistry::release`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// Other holders remain.
    Retained(ColumnEntry),
    /// The last holder went away; the entry (as it was) is gone.
    Removed(ColumnEntry),
    /// No entry for the key. Logged and otherwise ignored.
    Unknown,
    /// The reference was taken before a [`ColumnRegistry::clear`], which
    /// already dropped it.
    Stale,
}

#[derive(Default)]
struct RegistryInner {
    entries: Vec<ColumnEntry>,
    index: FxHashMap<String, usize>,
    published: ColumnTemplate,
    version: u64,
    generation: u64,
    subscribers: Vec<TemplateCallbackWeak>,
}

impl RegistryInner {
    fn template(&self) -> ColumnTemplate {
        ColumnTemplate::new(
            self.entries
                .iter()
                .map(|entry| ColumnTrack {
                    key: entry.key.clone(),
                    min_width_px: entry.max_width_px,
                })
                .collect(),
        )
    }

    fn remove(&mut self, position: usize) -> ColumnEntry {
        let entry = self.entries.remove(position);
        self.index.remove(&entry.key);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        entry
    }

    /// Recompute the template; on change, bump the version and return the
    /// live callbacks to notify.
    fn republish(&mut self) -> Option<(ColumnTemplate, Vec<TemplateCallback>)> {
        let template = self.template();
        if template == self.published {
            return None;
        }
        self.published = template.clone();
        self.version += 1;
        self.subscribers.retain(|weak| weak.strong_count() > 0);
        let callbacks = self.subscribers.iter().filter_map(Weak::upgrade).collect();
        Some((template, callbacks))
    }
}

/// Shared registry of column widths.
///
/// Cloning a `ColumnRegistry` creates a new handle to the **same** state.
/// One registry is created per mounted tree and shared with every probe;
/// [`ColumnRegistry::clear`] is the teardown hook for the tree's unmount.
#[derive(Clone, Default)]
pub struct ColumnRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl std::fmt::Debug for ColumnRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ColumnRegistry")
            .field("entries", &inner.entries)
            .field("version", &inner.version)
            .field("generation", &inner.generation)
            .field("subscriber_count", &inner.subscribers.len())
            .finish()
    }
}

impl ColumnRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more holder of `key` and raise its width to `width_px` if
    /// wider. Returns the entry after the update.
    pub fn report(&self, key: &str, width_px: u32) -> ColumnEntry {
        self.report_held(key, width_px).0
    }

    /// [`Self::report`], also returning the generation the new reference
    /// belongs to.
    pub(crate) fn report_held(&self, key: &str, width_px: u32) -> (ColumnEntry, u64) {
        let (entry, generation, publish) = {
            let mut inner = self.inner.borrow_mut();
            let generation = inner.generation;
            let entry = match inner.index.get(key).copied() {
                Some(position) => {
                    let entry = &mut inner.entries[position];
                    entry.reference_count = entry.reference_count.saturating_add(1);
                    if width_px > entry.max_width_px {
                        entry.max_width_px = width_px;
                    }
                    entry.clone()
                }
                None => {
                    let entry = ColumnEntry {
                        key: key.to_string(),
                        max_width_px: width_px,
                        reference_count: 1,
                    };
                    let position = inner.entries.len();
                    inner.entries.push(entry.clone());
                    inner.index.insert(key.to_string(), position);
                    entry
                }
            };
            (entry, generation, inner.republish())
        };
        tracing::trace!(
            target: "sly.columns",
            key,
            width_px,
            max_width_px = entry.max_width_px,
            reference_count = entry.reference_count,
            "column width reported"
        );
        self.notify(publish);
        (entry, generation)
    }

    /// Release a reference taken in `generation`. References from before the
    /// latest [`Self::clear`] are skipped.
    pub(crate) fn release_held(&self, key: &str, generation: u64) -> ReleaseOutcome {
        let current = self.generation();
        if generation != current {
            tracing::trace!(
                target: "sly.columns",
                key,
                generation,
                current,
                "stale column reference skipped"
            );
            return ReleaseOutcome::Stale;
        }
        self.release(key)
    }

    /// Drop one holder of `key`, removing the entry at zero.
    pub fn release(&self, key: &str) -> ReleaseOutcome {
        let (outcome, publish) = {
            let mut inner = self.inner.borrow_mut();
            match inner.index.get(key).copied() {
                None => (ReleaseOutcome::Unknown, None),
                Some(position) if inner.entries[position].reference_count <= 1 => {
                    let removed = inner.remove(position);
                    (ReleaseOutcome::Removed(removed), inner.republish())
                }
                Some(position) => {
                    let entry = &mut inner.entries[position];
                    entry.reference_count -= 1;
                    (ReleaseOutcome::Retained(entry.clone()), None)
                }
            }
        };
        match &outcome {
            ReleaseOutcome::Unknown => {
                tracing::warn!(target: "sly.columns", key, "release of unregistered column");
            }
            ReleaseOutcome::Removed(entry) => {
                tracing::trace!(
                    target: "sly.columns",
                    key,
                    max_width_px = entry.max_width_px,
                    "column removed"
                );
            }
            ReleaseOutcome::Retained(_) | ReleaseOutcome::Stale => {}
        }
        self.notify(publish);
        outcome
    }

    #[must_use]
    pub fn entry(&self, key: &str) -> Option<ColumnEntry> {
        let inner = self.inner.borrow();
        inner
            .index
            .get(key)
            .map(|position| inner.entries[*position].clone())
    }

    /// All entries in first-report order.
    #[must_use]
    pub fn entries(&self) -> Vec<ColumnEntry> {
        self.inner.borrow().entries.clone()
    }

    /// Current derived template.
    #[must_use]
    pub fn template(&self) -> ColumnTemplate {
        self.inner.borrow().template()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Number of template publications so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of clears so far. A probe whose reference is from an older
    /// generation skips its release.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.borrow().generation
    }

    /// Drop every entry and start a new generation, publishing the empty
    /// template if it changed. Subscriptions stay registered.
    pub fn clear(&self) {
        let publish = {
            let mut inner = self.inner.borrow_mut();
            let dropped = inner.entries.len();
            inner.entries.clear();
            inner.index.clear();
            inner.generation = inner.generation.wrapping_add(1);
            tracing::debug!(
                target: "sly.columns",
                dropped,
                generation = inner.generation,
                "column registry cleared"
            );
            inner.republish()
        };
        self.notify(publish);
    }

    /// Call `callback` with every newly published template.
    ///
    /// Dropping the returned guard unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&ColumnTemplate) + 'static) -> TemplateSubscription {
        let strong: TemplateCallback = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        TemplateSubscription { _callback: strong }
    }

    /// Subscribers registered, including dropped ones not yet pruned.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self, publish: Option<(ColumnTemplate, Vec<TemplateCallback>)>) {
        let Some((template, callbacks)) = publish else {
            return;
        };
        tracing::debug!(
            target: "sly.columns",
            version = self.version(),
            columns = template.len(),
            template = %template,
            "column template published"
        );
        for callback in &callbacks {
            callback(&template);
        }
    }
}

/// RAII guard for a template subscriber.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct TemplateSubscription {
    _callback: TemplateCallback,
}

impl std::fmt::Debug for TemplateSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateSubscription").finish_non_exhaustive()
    }
}
