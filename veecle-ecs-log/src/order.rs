//! Ordering of dotted attribute keys.
//!
//! Sorting attributes with [`compare_keys`] makes every set of keys sharing a path component
//! contiguous, recursively for every level of nesting.
//! This lets the resolver build nested objects in a single pass.
//!
//! At the first differing byte the separator sorts after any other byte, and other bytes sort
//! in descending order. When one key is a prefix of the other, the longer key sorts first, so
//! `"log.data"` is placed before `"log"` and a scalar `"log"` is always seen after the members
//! of a `"log"` group.
//!
//! ```rust
//! use veecle_ecs_log::order::sort_keys;
//!
//! let mut keys = ["log.data", "source.func", "log"];
//! sort_keys(&mut keys);
//! assert_eq!(keys, ["source.func", "log.data", "log"]);
//! ```

use std::cmp::Ordering;

use crate::value::SEPARATOR;

/// Compares two dotted keys.
///
/// Never returns [`Ordering::Equal`] for different keys, so a stable sort keeps the relative
/// order of identical keys only.
pub fn compare_keys(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.as_bytes(), b.as_bytes());

    for (&x, &y) in a.iter().zip(b) {
        if x == y {
            continue;
        }
        if x == SEPARATOR {
            return Ordering::Greater;
        }
        if y == SEPARATOR {
            return Ordering::Less;
        }
        return y.cmp(&x);
    }

    b.len().cmp(&a.len())
}

/// Sorts keys with [`compare_keys`], keeping the relative order of identical keys.
pub fn sort_keys<K>(keys: &mut [K])
where
    K: AsRef<str>,
{
    keys.sort_by(|a, b| compare_keys(a.as_ref(), b.as_ref()));
}
