//! Property invariants for random probe mount/update/unmount streams.
//!
//! Each stream is replayed against a plain model of the registry: per key,
//! the widths of the probes currently holding it. The registry must agree on
//! reference counts at every step, and its widths must ratchet. Probes that
//! outlive a clear hold nothing and must not disturb newer holders.

use std::collections::BTreeMap;

use proptest::prelude::*;
use sly_columns::{ColumnProbe, ColumnRegistry};

#[derive(Debug, Clone)]
enum Op {
    Mount { key: u8, width: u32 },
    Update { slot: usize, key: Option<u8>, width: u32 },
    Unmount { slot: usize },
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..4, 0u32..300).prop_map(|(key, width)| Op::Mount { key, width }),
        3 => (any::<usize>(), proptest::option::of(0u8..4), 0u32..300)
            .prop_map(|(slot, key, width)| Op::Update { slot, key, width }),
        3 => any::<usize>().prop_map(|slot| Op::Unmount { slot }),
        1 => Just(Op::Clear),
    ]
}

fn key_name(key: u8) -> String {
    format!("col{key}")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn reference_counts_match_live_probes(ops in proptest::collection::vec(op_strategy(), 1..80)) {
        let registry = ColumnRegistry::new();
        let mut probes: Vec<ColumnProbe> = Vec::new();

        for op in ops {
            let before: BTreeMap<String, u32> = registry
                .entries()
                .into_iter()
                .map(|entry| (entry.key, entry.max_width_px))
                .collect();

            match op {
                Op::Mount { key, width } => {
                    probes.push(ColumnProbe::attach(&registry, key_name(key), &width));
                }
                Op::Update { slot, key, width } if !probes.is_empty() => {
                    let slot = slot % probes.len();
                    let key = key.map(key_name);
                    probes[slot].update(&width, key.as_deref());
                }
                Op::Unmount { slot } if !probes.is_empty() => {
                    let slot = slot % probes.len();
                    drop(probes.swap_remove(slot));
                }
                Op::Clear => registry.clear(),
                Op::Update { .. } | Op::Unmount { .. } => {}
            }

            let generation = registry.generation();
            let live: Vec<&ColumnProbe> = probes
                .iter()
                .filter(|probe| probe.generation() == generation)
                .collect();
            let mut expected: BTreeMap<String, u32> = BTreeMap::new();
            for probe in &live {
                *expected.entry(probe.key().to_string()).or_default() += 1;
            }
            let actual: BTreeMap<String, u32> = registry
                .entries()
                .into_iter()
                .map(|entry| (entry.key, entry.reference_count))
                .collect();
            prop_assert_eq!(&actual, &expected);

            for entry in registry.entries() {
                // Ratchet: a surviving key never got narrower.
                if let Some(previous) = before.get(&entry.key) {
                    prop_assert!(entry.max_width_px >= *previous);
                }
                // The max covers every live holder's latest measurement.
                let widest_live = live
                    .iter()
                    .filter(|probe| probe.key() == entry.key)
                    .map(|probe| probe.width_px())
                    .max()
                    .unwrap_or(0);
                prop_assert!(entry.max_width_px >= widest_live);
            }
        }

        drop(probes);
        prop_assert!(registry.is_empty());
        prop_assert_eq!(registry.template().to_string(), "");
    }

    #[test]
    fn template_tracks_follow_entries(widths in proptest::collection::vec((0u8..6, 1u32..500), 1..30)) {
        let registry = ColumnRegistry::new();
        let _probes: Vec<ColumnProbe> = widths
            .iter()
            .map(|(key, width)| ColumnProbe::attach(&registry, key_name(*key), width))
            .collect();
        let template = registry.template();
        let entries = registry.entries();
        prop_assert_eq!(template.len(), entries.len());
        for (track, entry) in template.tracks().iter().zip(&entries) {
            prop_assert_eq!(&track.key, &entry.key);
            prop_assert_eq!(track.min_width_px, entry.max_width_px);
        }
    }
}
