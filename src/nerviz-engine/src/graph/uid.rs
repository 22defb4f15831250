// Copyright 2026 The Nerviz Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter backing node and edge ids.  Starts at 1 so that 0
/// never names a real element.
static NEXT_UID: AtomicU64 = AtomicU64::new(1);

fn alloc_uid() -> u64 {
    NEXT_UID.fetch_add(1, Ordering::Relaxed)
}

macro_rules! uid_type(
    ($name:ident, $prefix:expr) => {
        /// Opaque identifier, unique across every graph in the process.
        /// Ids compare in allocation order, which gives graphs a stable
        /// iteration order.
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            pub(crate) fn fresh() -> Self {
                $name(alloc_uid())
            }

            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    }
);

uid_type!(NodeId, "n");
uid_type!(EdgeId, "e");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uids_are_unique_and_nonzero() {
        let ids: Vec<NodeId> = (0..50).map(|_| NodeId::fresh()).collect();
        for (i, a) in ids.iter().enumerate() {
            assert_ne!(a.get(), 0);
            for b in &ids[(i + 1)..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_uids_increase_in_allocation_order() {
        let first = EdgeId::fresh();
        let second = EdgeId::fresh();
        assert!(first < second);
    }

    #[test]
    fn test_node_and_edge_ids_share_counter() {
        let node = NodeId::fresh();
        let edge = EdgeId::fresh();
        assert_ne!(node.get(), edge.get());
        assert_eq!(format!("{node:?}"), format!("n{}", node.get()));
        assert_eq!(format!("{edge}"), format!("{}", edge.get()));
    }
}
