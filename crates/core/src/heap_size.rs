//! Byte accounting for tracked values.

use std::collections::HashMap;
use std::mem::size_of;

/// Bytes a value owns on the heap, not counting its own inline size.
pub trait HeapSize {
    fn heap_size(&self) -> usize;
}

macro_rules! no_heap {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HeapSize for $ty {
                #[inline]
                fn heap_size(&self) -> usize {
                    0
                }
            }
        )*
    };
}

no_heap!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
);

impl HeapSize for String {
    fn heap_size(&self) -> usize {
        self.capacity()
    }
}

impl<T: HeapSize> HeapSize for Vec<T> {
    fn heap_size(&self) -> usize {
        self.iter().fold(
            self.capacity().saturating_mul(size_of::<T>()),
            |acc, item| acc.saturating_add(item.heap_size()),
        )
    }
}

impl<T: HeapSize> HeapSize for Box<T> {
    fn heap_size(&self) -> usize {
        size_of::<T>().saturating_add((**self).heap_size())
    }
}

impl<T: HeapSize> HeapSize for Option<T> {
    fn heap_size(&self) -> usize {
        self.as_ref().map_or(0, HeapSize::heap_size)
    }
}

impl<K: HeapSize, V: HeapSize, S> HeapSize for HashMap<K, V, S> {
    fn heap_size(&self) -> usize {
        let slots = self
            .capacity()
            .saturating_mul(size_of::<K>().saturating_add(size_of::<V>()));
        self.iter().fold(slots, |acc, (k, v)| {
            acc.saturating_add(k.heap_size())
                .saturating_add(v.heap_size())
        })
    }
}
