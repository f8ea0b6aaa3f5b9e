//! Per-cell width probes.

use sly_core::Length;

use crate::registry::{ColumnRegistry, ReleaseOutcome};

/// Something whose rendered width can be measured, in CSS pixels.
pub trait MeasureWidth {
    fn measured_width(&self) -> f64;
}

impl MeasureWidth for f64 {
    fn measured_width(&self) -> f64 {
        *self
    }
}

impl MeasureWidth for f32 {
    fn measured_width(&self) -> f64 {
        f64::from(*self)
    }
}

impl MeasureWidth for u32 {
    fn measured_width(&self) -> f64 {
        f64::from(*self)
    }
}

impl MeasureWidth for Length {
    fn measured_width(&self) -> f64 {
        self.get()
    }
}

impl<T: MeasureWidth + ?Sized> MeasureWidth for &T {
    fn measured_width(&self) -> f64 {
        (**self).measured_width()
    }
}

/// Whole-pixel width of `node`: rounded up, with negative or non-finite
/// measurements treated as zero.
fn width_px<N: MeasureWidth + ?Sized>(node: &N) -> u32 {
    Length::px(node.measured_width()).ceil_px()
}

/// Registration of one mounted cell under a column key.
///
/// The probe holds exactly one reference on its current key from
/// [`ColumnProbe::attach`] until [`ColumnProbe::detach`] or drop, unless a
/// [`ColumnRegistry::clear`] drops it first. The reference is tagged with
/// the registry generation, so a probe that outlives a clear never releases
/// a key that newer probes hold.
#[derive(Debug)]
#[must_use = "dropping a probe releases its column immediately"]
pub struct ColumnProbe {
    registry: ColumnRegistry,
    key: String,
    width_px: u32,
    generation: u64,
    attached: bool,
}

impl ColumnProbe {
    /// Measure `node` and report it under `key`.
    pub fn attach<N: MeasureWidth + ?Sized>(
        registry: &ColumnRegistry,
        key: impl Into<String>,
        node: &N,
    ) -> Self {
        let key = key.into();
        let width_px = width_px(node);
        let (_, generation) = registry.report_held(&key, width_px);
        Self {
            registry: registry.clone(),
            key,
            width_px,
            generation,
            attached: true,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Width reported by the latest measurement.
    #[must_use]
    pub const fn width_px(&self) -> u32 {
        self.width_px
    }

    /// Registry generation the probe's reference belongs to.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Re-measure `node` and report under `key` (or the current key).
    ///
    /// The new report lands before the old reference is released, so an
    /// update under the same key never drops the entry, and a key change
    /// moves exactly one reference.
    pub fn update<N: MeasureWidth + ?Sized>(&mut self, node: &N, key: Option<&str>) {
        if !self.attached {
            return;
        }
        let next_key = key.map_or_else(|| self.key.clone(), str::to_string);
        let width_px = width_px(node);
        let (_, generation) = self.registry.report_held(&next_key, width_px);
        self.registry.release_held(&self.key, self.generation);
        self.key = next_key;
        self.width_px = width_px;
        self.generation = generation;
    }

    /// Release the probe's reference now.
    pub fn detach(mut self) -> ReleaseOutcome {
        self.release()
    }

    fn release(&mut self) -> ReleaseOutcome {
        if !std::mem::replace(&mut self.attached, false) {
            return ReleaseOutcome::Unknown;
        }
        self.registry.release_held(&self.key, self.generation)
    }
}

impl Drop for ColumnProbe {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ColumnEntry;

    #[test]
    fn attach_reports_ceiled_width() {
        let registry = ColumnRegistry::new();
        let probe = ColumnProbe::attach(&registry, "size", &79.2_f64);
        assert_eq!(probe.width_px(), 80);
        assert_eq!(registry.entry("size").map(|e| e.max_width_px), Some(80));
    }

    #[test]
    fn anomalous_widths_report_zero() {
        let registry = ColumnRegistry::new();
        let negative = ColumnProbe::attach(&registry, "a", &-5.0_f64);
        let nan = ColumnProbe::attach(&registry, "a", &f64::NAN);
        assert_eq!(negative.width_px(), 0);
        assert_eq!(nan.width_px(), 0);
        assert_eq!(registry.entry("a").map(|e| e.reference_count), Some(2));
    }

    #[test]
    fn drop_releases_once() {
        let registry = ColumnRegistry::new();
        let first = ColumnProbe::attach(&registry, "a", &10_u32);
        let second = ColumnProbe::attach(&registry, "a", &20_u32);
        assert!(matches!(first.detach(), ReleaseOutcome::Retained(_)));
        drop(second);
        assert!(registry.is_empty());
    }

    #[test]
    fn same_key_update_keeps_entry() {
        let registry = ColumnRegistry::new();
        let mut probe = ColumnProbe::attach(&registry, "a", &10_u32);
        probe.update(&30_u32, None);
        let entry = registry.entry("a").expect("entry survives update");
        assert_eq!(entry.reference_count, 1);
        assert_eq!(entry.max_width_px, 30);
    }

    #[test]
    fn key_change_moves_the_reference() {
        let registry = ColumnRegistry::new();
        let _other = ColumnProbe::attach(&registry, "a", &50_u32);
        let mut probe = ColumnProbe::attach(&registry, "a", &10_u32);
        probe.update(&12_u32, Some("b"));
        assert_eq!(probe.key(), "b");
        assert_eq!(registry.entry("a").map(|e| e.reference_count), Some(1));
        assert_eq!(registry.entry("b").map(|e| e.reference_count), Some(1));
        drop(probe);
        assert_eq!(registry.entry("b"), None);
    }

    #[test]
    fn probe_from_before_clear_leaves_new_holders_alone() {
        let registry = ColumnRegistry::new();
        let old = ColumnProbe::attach(&registry, "size", &90_u32);
        registry.clear();
        let fresh = ColumnProbe::attach(&registry, "size", &30_u32);

        assert_eq!(old.detach(), ReleaseOutcome::Stale);
        assert_eq!(
            registry.entry("size"),
            Some(ColumnEntry {
                key: "size".to_string(),
                max_width_px: 30,
                reference_count: 1,
            })
        );
        drop(fresh);
        assert!(registry.is_empty());
    }

    #[test]
    fn update_across_clear_takes_a_fresh_reference() {
        let registry = ColumnRegistry::new();
        let mut probe = ColumnProbe::attach(&registry, "a", &40_u32);
        let _other = ColumnProbe::attach(&registry, "a", &10_u32);
        registry.clear();
        let _live = ColumnProbe::attach(&registry, "a", &20_u32);

        probe.update(&25_u32, None);
        assert_eq!(registry.entry("a").map(|e| e.reference_count), Some(2));
        assert_eq!(registry.entry("a").map(|e| e.max_width_px), Some(25));
        drop(probe);
        assert_eq!(registry.entry("a").map(|e| e.reference_count), Some(1));
    }
}
