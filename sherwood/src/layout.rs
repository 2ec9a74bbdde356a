//! Slot layout: one-shot Robin Hood construction and bounded lookup
//!
//! [`build`] consumes the complete pair list, sizes a power-of-two slot
//! array, and places every pair with Robin Hood displacement: on a
//! collision the entry closer to its ideal slot yields to the one that
//! has travelled farther, which keeps the spread of probe distances
//! narrow. The largest distance seen while placing anything is recorded
//! in the finished [`Layout`] and becomes the hard probe budget for every
//! later [`Layout::get`].
//!
//! Nothing here runs twice: a `Layout` is produced by one `build` call
//! and is read-only from then on.

use crate::context::HashContext;
use crate::err::Error;
use crate::DuplicatePolicy;
use std::borrow::Borrow;
use std::mem;

/// Slot count for `pairs` entries: the smallest power of two at or above
/// `ceil(pairs * 5 / 3)`
///
/// This keeps the load factor at or below 60%, so probe chains stay
/// short and insertion always finds a vacancy.
fn capacity_for(pairs: usize) -> usize {
    (pairs * 5).div_ceil(3).next_power_of_two()
}

/// One occupied table cell
#[derive(Clone, Debug)]
struct Slot<K, V> {
    /// Linear probe steps between this cell and the key's ideal position
    distance: u32,
    /// The stored key, owned by the table
    key: K,
    /// The value served for `key`
    value: V,
}

/// A finished table layout
///
/// Holds the slot array, the wrap mask, and the probe bound frozen at
/// construction. The wrapping [`crate::StaticMap`] pairs this with the
/// context that hashed it.
#[derive(Clone, Debug)]
pub(crate) struct Layout<K, V> {
    /// Slot storage; the length is always a power of two
    slots: Box<[Option<Slot<K, V>>]>,
    /// `slots.len() - 1`, for wrapping probe positions
    mask: usize,
    /// Largest probe distance of any occupied slot
    max_probe: u32,
    /// Number of distinct keys stored
    len: usize,
}

/// Lay out `pairs` into a fresh table
///
/// Each pair starts at the position its hash selects and probes linearly.
/// A vacancy ends the probe. An occupant with an equal key is resolved by
/// `duplicates`: overwritten in place, or reported as [`Error::Duplicate`]
/// with the input position of the later pair. Any other occupant keeps
/// its slot only while it is at least as far from home as the incoming
/// entry; otherwise it is evicted and carries on probing with its own
/// recorded distance.
pub(crate) fn build<K, V, C>(
    pairs: Vec<(K, V)>,
    context: &C,
    duplicates: DuplicatePolicy,
) -> Result<Layout<K, V>, Error>
where
    C: HashContext<K>,
{
    if pairs.is_empty() {
        return Err(Error::Empty);
    }
    let capacity = capacity_for(pairs.len());
    let mask = capacity - 1;

    let mut slots: Vec<Option<Slot<K, V>>> = Vec::new();
    slots.resize_with(capacity, || None);
    let mut max_probe = 0_u32;
    let mut len = 0_usize;

    'pairs: for (index, (key, value)) in pairs.into_iter().enumerate() {
        let mut position = (context.hash(&key) as usize) & mask;
        let mut incoming = Slot {
            distance: 0,
            key,
            value,
        };

        // The capacity rule leaves at least 40% of slots vacant, so every
        // probe terminates well within one lap of the array.
        for _ in 0..capacity {
            match &mut slots[position] {
                vacant @ None => {
                    max_probe = max_probe.max(incoming.distance);
                    *vacant = Some(incoming);
                    len += 1;
                    continue 'pairs;
                }
                Some(occupant) if context.eql(&occupant.key, &incoming.key) => {
                    if duplicates == DuplicatePolicy::Reject {
                        return Err(Error::Duplicate { index });
                    }
                    // Equal keys share an ideal position, so the occupant
                    // already sits at the incoming entry's distance.
                    max_probe = max_probe.max(incoming.distance);
                    *occupant = incoming;
                    continue 'pairs;
                }
                Some(occupant) => {
                    if occupant.distance < incoming.distance {
                        // Robin Hood: the occupant is closer to home, so
                        // it yields and resumes probing from here with its
                        // own recorded distance.
                        max_probe = max_probe.max(incoming.distance);
                        mem::swap(occupant, &mut incoming);
                    }
                    position = (position + 1) & mask;
                    incoming.distance += 1;
                }
            }
        }
        unreachable!("no vacancy within {} slots; the capacity rule was violated", capacity);
    }

    Ok(Layout {
        slots: slots.into_boxed_slice(),
        mask,
        max_probe,
        len,
    })
}

impl<K, V> Layout<K, V> {
    /// Bounded probe for `key`, inspecting at most `max_probe + 1` slots
    ///
    /// A vacancy on the probe path proves absence early: had the key been
    /// placed, it would occupy a slot at or before that vacancy.
    pub(crate) fn get<Q: ?Sized, C>(&self, key: &Q, context: &C) -> Option<&V>
    where
        K: Borrow<Q>,
        C: HashContext<Q>,
    {
        let ideal = (context.hash(key) as usize) & self.mask;
        for distance in 0..=self.max_probe {
            match &self.slots[(ideal + distance as usize) & self.mask] {
                None => return None,
                Some(slot) if context.eql(slot.key.borrow(), key) => {
                    return Some(&slot.value);
                }
                Some(_) => {}
            }
        }
        None
    }

    /// Number of distinct keys stored
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Total slot count, always a power of two
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Largest probe distance of any occupied slot
    pub(crate) fn max_probe_distance(&self) -> u32 {
        self.max_probe
    }

    /// Occupied-slot count per probe distance, indexes `0..=max_probe`
    pub(crate) fn probe_histogram(&self) -> Vec<usize> {
        let mut counts = vec![0_usize; self.max_probe as usize + 1];
        for slot in self.slots.iter().flatten() {
            counts[slot.distance as usize] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod test {
    use super::{build, capacity_for};
    use crate::{AutoContext, DuplicatePolicy, Error, HashContext};

    #[test]
    fn capacity_values() {
        // Smallest power of two at or above ceil(n * 5 / 3)
        assert_eq!(capacity_for(1), 2);
        assert_eq!(capacity_for(2), 4);
        assert_eq!(capacity_for(3), 8);
        assert_eq!(capacity_for(4), 8);
        assert_eq!(capacity_for(5), 16);
        assert_eq!(capacity_for(9), 16);
        assert_eq!(capacity_for(38), 64);
        assert_eq!(capacity_for(39), 128);
        assert_eq!(capacity_for(100), 256);
    }

    #[test]
    fn stored_distances_match_ideal_positions() {
        let context = AutoContext;
        let pairs: Vec<(u64, u64)> = (0..200).map(|k| (k * k + 7, k)).collect();
        let layout = build(pairs, &context, DuplicatePolicy::LastWins).unwrap();

        let capacity = layout.capacity();
        let mask = capacity - 1;
        let mut seen_max = 0;
        for (position, slot) in layout.slots.iter().enumerate() {
            let Some(slot) = slot else { continue };
            let ideal = (context.hash(&slot.key) as usize) & mask;
            let distance = (position + capacity - ideal) & mask;
            assert_eq!(distance as u32, slot.distance);
            seen_max = seen_max.max(slot.distance);
        }
        assert_eq!(seen_max, layout.max_probe_distance());
    }

    #[test]
    fn rejects_empty_input() {
        let outcome = build(Vec::<(u64, u64)>::new(), &AutoContext, DuplicatePolicy::LastWins);
        assert!(matches!(outcome, Err(Error::Empty)));
    }
}
