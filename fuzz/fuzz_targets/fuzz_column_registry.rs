#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sly_columns::{ColumnProbe, ColumnRegistry};

#[derive(Debug, Arbitrary)]
enum Op {
    Attach { key: u8, width: f32 },
    Update { slot: u8, key: Option<u8>, width: f32 },
    Detach { slot: u8 },
    ReleaseRaw { key: u8 },
    Clear,
}

fuzz_target!(|ops: Vec<Op>| {
    let registry = ColumnRegistry::new();
    let mut probes: Vec<ColumnProbe> = Vec::new();
    let key = |k: u8| format!("k{}", k % 8);
    let mut desynced = false;

    for op in ops.into_iter().take(512) {
        match op {
            Op::Attach { key: k, width } => {
                probes.push(ColumnProbe::attach(&registry, key(k), &width));
            }
            Op::Update { slot, key: k, width } if !probes.is_empty() => {
                let slot = usize::from(slot) % probes.len();
                let next = k.map(key);
                probes[slot].update(&width, next.as_deref());
            }
            Op::Detach { slot } if !probes.is_empty() => {
                let slot = usize::from(slot) % probes.len();
                let _ = probes.swap_remove(slot).detach();
            }
            // Stray releases desynchronize probes from the registry; they
            // must not panic or underflow.
            Op::ReleaseRaw { key: k } => {
                desynced = true;
                let _ = registry.release(&key(k));
            }
            Op::Clear => registry.clear(),
            Op::Update { .. } | Op::Detach { .. } => {}
        }

        for entry in registry.entries() {
            assert!(entry.reference_count > 0, "zero-count entry survived");
        }
        assert_eq!(registry.template().len(), registry.len());

        if !desynced {
            let generation = registry.generation();
            for entry in registry.entries() {
                let holders = probes
                    .iter()
                    .filter(|probe| probe.generation() == generation && probe.key() == entry.key)
                    .count();
                assert_eq!(holders, entry.reference_count as usize, "{entry:?}");
            }
        }
    }

    drop(probes);
});
