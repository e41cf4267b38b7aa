//! Sample tracked objects for `serve --demo-objects`.

use std::collections::HashMap;
use std::sync::Arc;

use memhunt_core::{HeapRegistry, Tracked};

/// Demo values kept alive for the lifetime of the server.
#[derive(Debug, Default)]
pub struct DemoObjects {
    strings: Vec<Tracked<String>>,
    buffers: Vec<Tracked<Vec<u64>>>,
    tables: Vec<Tracked<HashMap<u32, String>>>,
    boxes: Vec<Tracked<Box<u64>>>,
}

impl DemoObjects {
    pub fn len(&self) -> usize {
        self.strings
            .len()
            .saturating_add(self.buffers.len())
            .saturating_add(self.tables.len())
            .saturating_add(self.boxes.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Track `count` values, cycling through a few types of different sizes.
pub fn seed(registry: &Arc<HeapRegistry>, count: usize) -> DemoObjects {
    let mut demo = DemoObjects::default();
    for n in 0..count {
        match n % 4 {
            0 => demo.strings.push(registry.track("x".repeat(n % 64))),
            1 => demo.buffers.push(registry.track(vec![0_u64; n % 128])),
            2 => demo.tables.push(registry.track(
                (0..u32::try_from(n % 16).unwrap_or(0))
                    .map(|k| (k, k.to_string()))
                    .collect(),
            )),
            _ => demo
                .boxes
                .push(registry.track(Box::new(u64::try_from(n).unwrap_or(u64::MAX)))),
        }
    }
    demo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_tracks_requested_count() {
        let registry = HeapRegistry::new();
        let demo = seed(&registry, 10);

        assert_eq!(demo.len(), 10);
        assert_eq!(registry.len(), 10);

        drop(demo);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_seed_zero_is_empty() {
        let registry = HeapRegistry::new();
        assert!(seed(&registry, 0).is_empty());
    }
}
