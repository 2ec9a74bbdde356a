#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(noop_method_call)]
#![warn(unreachable_pub)]
#![warn(clippy::all)]
#![deny(clippy::cargo_common_metadata)]
#![deny(clippy::cast_lossless)]
#![deny(clippy::checked_conversions)]
#![warn(clippy::cognitive_complexity)]
#![deny(clippy::debug_assert_with_mut_call)]
#![deny(clippy::exhaustive_enums)]
#![deny(clippy::expl_impl_clone_on_copy)]
#![deny(clippy::fallible_impl_from)]
#![deny(clippy::implicit_clone)]
#![deny(clippy::large_stack_arrays)]
#![warn(clippy::manual_ok_or)]
#![deny(clippy::missing_docs_in_private_items)]
#![warn(clippy::needless_borrow)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::option_option)]
#![deny(clippy::print_stderr)]
#![deny(clippy::print_stdout)]
#![warn(clippy::rc_buffer)]
#![deny(clippy::ref_option_ref)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::trait_duplication_in_bounds)]
#![deny(clippy::unnecessary_wraps)]
#![warn(clippy::unseparated_literal_suffix)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::mod_module_files)]
#![allow(clippy::uninlined_format_args)]

mod context;
mod err;
mod layout;
mod siphash;

pub use context::{AutoContext, BytesContext, HashContext};
pub use err::Error;
pub use siphash::{SipHasher, SipHasher13};

use layout::Layout;
use std::borrow::Borrow;
use std::hash::Hash;

/// How construction resolves two pairs whose keys compare equal
///
/// A finished table never stores one key twice; this only chooses what
/// happens to the extra pair.
#[derive(Default, Debug, Copy, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum DuplicatePolicy {
    /// Keep the later pair: its value silently replaces the earlier one.
    /// This is the default, and matches repeated insertion into an
    /// ordinary map.
    #[default]
    LastWins,
    /// Fail construction with [`Error::Duplicate`], reporting the input
    /// position of the later pair
    Reject,
}

/// Immutable key/value lookup table with a layout fixed at construction
///
/// A `StaticMap` is laid out exactly once, by [`StaticMap::build`] or a
/// [`StaticMapBuilder`], from a complete list of key/value pairs. Slots
/// are assigned with Robin Hood open addressing: colliding entries are
/// displaced so that none ends up much farther from its ideal slot than
/// the others, and the worst displacement observed while placing is
/// recorded. Every later lookup probes at most that recorded distance
/// plus one slots, hit or miss.
///
/// The table never reallocates, rehashes, or mutates after construction,
/// so shared references to it can be used from any number of threads.
/// The usual home for one is a [`std::sync::LazyLock`] static built on
/// first use.
#[derive(Clone, Debug)]
pub struct StaticMap<K, V, C = AutoContext> {
    /// Slot array, wrap mask, and the frozen probe bound
    layout: Layout<K, V>,
    /// Strategy consulted for every hash and key comparison
    context: C,
}

impl<K, V> StaticMap<K, V> {
    /// Build a table from `pairs` with the [`AutoContext`] strategy
    ///
    /// Equivalent to [`StaticMapBuilder::new()`] followed by
    /// [`StaticMapBuilder::build()`]: duplicate keys keep the later
    /// pair's value. Fails with [`Error::Empty`] when `pairs` yields
    /// nothing.
    pub fn build<I>(pairs: I) -> Result<Self, Error>
    where
        K: Hash + Eq,
        I: IntoIterator<Item = (K, V)>,
    {
        StaticMapBuilder::new().build(pairs)
    }
}

impl<K, V, C> StaticMap<K, V, C> {
    /// Build a table from `pairs`, hashing and comparing through `context`
    ///
    /// Duplicate keys keep the later pair's value; use a
    /// [`StaticMapBuilder`] to reject them instead.
    pub fn build_with_context<I>(pairs: I, context: C) -> Result<Self, Error>
    where
        C: HashContext<K> + Clone,
        I: IntoIterator<Item = (K, V)>,
    {
        StaticMapBuilder::with_context(context).build(pairs)
    }

    /// Look up the value stored for `key`
    ///
    /// The key may be any borrowed form of the stored key type, provided
    /// the table's context handles both forms consistently; see
    /// [`HashContext`]. The probe inspects at most
    /// [`Self::max_probe_distance()`] plus one slots, and an absent key
    /// is usually rejected sooner, at the first vacancy on its probe
    /// path.
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        C: HashContext<Q>,
    {
        self.layout.get(key, &self.context)
    }

    /// Whether `key` is present, under the same rules as [`Self::get`]
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        C: HashContext<Q>,
    {
        self.get(key).is_some()
    }

    /// Number of distinct keys stored
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    /// Always false: construction rejects an empty pair list
    ///
    /// Present so the type carries the conventional `len`/`is_empty`
    /// pair.
    pub fn is_empty(&self) -> bool {
        self.layout.len() == 0
    }

    /// Total slot count
    ///
    /// Always the smallest power of two at or above `ceil(n * 5 / 3)`,
    /// where `n` counts the input pairs, duplicates included. The load
    /// factor therefore never exceeds 60%.
    pub fn capacity(&self) -> usize {
        self.layout.capacity()
    }

    /// Worst displacement recorded while the table was laid out
    ///
    /// No entry sits farther than this from its ideal slot, which is
    /// what lets lookups stop probing early.
    pub fn max_probe_distance(&self) -> u32 {
        self.layout.max_probe_distance()
    }

    /// Entry count per probe distance
    ///
    /// Index `d` holds the number of entries placed `d` slots from their
    /// ideal position. The vector always has `max_probe_distance() + 1`
    /// buckets and its sum is [`Self::len()`]. Useful for eyeballing how
    /// well the key set spreads.
    pub fn probe_histogram(&self) -> Vec<usize> {
        self.layout.probe_histogram()
    }
}

/// Builder for creating [`StaticMap`] instances with custom settings
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StaticMapBuilder<C = AutoContext> {
    /// Context the finished table will hash and compare keys with
    context: C,
    /// How construction resolves equal keys
    duplicates: DuplicatePolicy,
}

impl StaticMapBuilder<AutoContext> {
    /// Create a builder with the default [`AutoContext`] strategy
    pub fn new() -> Self {
        Self::with_context(AutoContext)
    }
}

impl<C> StaticMapBuilder<C> {
    /// Create a builder around a caller-supplied [`HashContext`]
    pub fn with_context(context: C) -> Self {
        Self {
            context,
            duplicates: DuplicatePolicy::default(),
        }
    }

    /// Select how duplicate keys are resolved
    pub fn duplicate_policy(&mut self, policy: DuplicatePolicy) -> &mut Self {
        self.duplicates = policy;
        self
    }

    /// Lay out a table from `pairs` with the selected options
    ///
    /// `pairs` must yield at least one pair, and input order is visible
    /// only through duplicate resolution. The context is cloned into the
    /// finished table, so the same builder can lay out any number of
    /// tables.
    pub fn build<K, V, I>(&self, pairs: I) -> Result<StaticMap<K, V, C>, Error>
    where
        C: HashContext<K> + Clone,
        I: IntoIterator<Item = (K, V)>,
    {
        let layout = layout::build(pairs.into_iter().collect(), &self.context, self.duplicates)?;
        Ok(StaticMap {
            layout,
            context: self.context.clone(),
        })
    }
}

impl Default for StaticMapBuilder<AutoContext> {
    fn default() -> Self {
        Self::new()
    }
}
