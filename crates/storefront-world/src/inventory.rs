//! Shelf inventories shared by every NPC touring an area.
//!
//! Each shelf area holds a set of unique item handles. NPCs take items one
//! at a time and never put them back, so an inventory only ever shrinks
//! during a session. Every [`ShelfInventory`] guards its item set with its
//! own [`Mutex`]: two steal attempts against the same shelf are serialized
//! even when they come from different threads, while steals against
//! different shelves never contend.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use rand::Rng;
use storefront_types::{AreaId, ItemId};

use crate::error::WorldError;

/// Number of shelf areas in the store. Valid areas are `1..=SHELF_AREA_COUNT`.
pub const SHELF_AREA_COUNT: u32 = 4;

/// The stealable items on one shelf area.
#[derive(Debug)]
pub struct ShelfInventory {
    /// Which area this shelf belongs to.
    area: AreaId,
    /// Number of items the shelf was stocked with.
    initial_len: usize,
    /// Items still on the shelf.
    items: Mutex<Vec<ItemId>>,
}

impl ShelfInventory {
    /// Create a shelf holding the given items.
    pub fn new(area: AreaId, items: Vec<ItemId>) -> Self {
        Self {
            area,
            initial_len: items.len(),
            items: Mutex::new(items),
        }
    }

    /// Create a shelf stocked with `count` freshly identified items.
    pub fn stocked(area: AreaId, count: usize) -> Self {
        let items = (0..count).map(|_| ItemId::new()).collect();
        Self::new(area, items)
    }

    /// The area this shelf belongs to.
    pub const fn area(&self) -> AreaId {
        self.area
    }

    /// Number of items the shelf was stocked with.
    pub const fn initial_len(&self) -> usize {
        self.initial_len
    }

    /// Number of items still on the shelf.
    pub fn len(&self) -> Result<usize, WorldError> {
        Ok(self.lock()?.len())
    }

    /// Whether the shelf has been emptied.
    pub fn is_empty(&self) -> Result<bool, WorldError> {
        Ok(self.lock()?.is_empty())
    }

    /// Whether the given item is still on this shelf.
    pub fn contains(&self, item: ItemId) -> Result<bool, WorldError> {
        Ok(self.lock()?.contains(&item))
    }

    /// Remove one item chosen uniformly at random and hand it to the caller.
    ///
    /// The selection and the removal happen under a single lock
    /// acquisition, so concurrent callers can never take the same item.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Empty`] if the shelf has no items left (the
    /// shelf is left untouched), or [`WorldError::LockPoisoned`] if another
    /// thread panicked while holding the lock.
    pub fn take_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ItemId, WorldError> {
        let mut items = self.lock()?;
        if items.is_empty() {
            return Err(WorldError::Empty { area: self.area });
        }
        let idx = rng.random_range(0..items.len());
        Ok(items.swap_remove(idx))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<ItemId>>, WorldError> {
        self.items
            .lock()
            .map_err(|_poisoned| WorldError::LockPoisoned { area: self.area })
    }
}

/// The store's shelf areas, keyed by area number.
///
/// Always holds exactly one shelf for each of the areas
/// `1..=SHELF_AREA_COUNT`. Area numbers outside that range resolve to
/// [`WorldError::InvalidArea`].
#[derive(Debug)]
pub struct StoreInventories {
    shelves: BTreeMap<AreaId, ShelfInventory>,
}

impl StoreInventories {
    /// Stock every area with `items_per_shelf` fresh items.
    pub fn stocked(items_per_shelf: usize) -> Self {
        let shelves = (1..=SHELF_AREA_COUNT)
            .map(|n| {
                let area = AreaId(n);
                (area, ShelfInventory::stocked(area, items_per_shelf))
            })
            .collect();
        Self { shelves }
    }

    /// Assemble the registry from explicit shelves.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidArea`] if a shelf names an area outside
    /// `1..=SHELF_AREA_COUNT`, or [`WorldError::InvalidLayout`] if an area is
    /// missing or listed twice.
    pub fn from_shelves(shelves: Vec<ShelfInventory>) -> Result<Self, WorldError> {
        let mut map = BTreeMap::new();
        for shelf in shelves {
            let area = shelf.area();
            if !is_valid_area(area) {
                return Err(WorldError::InvalidArea {
                    area,
                    max: SHELF_AREA_COUNT,
                });
            }
            if map.insert(area, shelf).is_some() {
                return Err(WorldError::InvalidLayout {
                    reason: format!("{area} listed more than once"),
                });
            }
        }
        let expected = usize::try_from(SHELF_AREA_COUNT).unwrap_or(usize::MAX);
        if map.len() != expected {
            return Err(WorldError::InvalidLayout {
                reason: format!("expected {expected} shelf areas, got {}", map.len()),
            });
        }
        Ok(Self { shelves: map })
    }

    /// Look up the shelf for an area number.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidArea`] for area 0 or anything above
    /// [`SHELF_AREA_COUNT`].
    pub fn resolve(&self, area: AreaId) -> Result<&ShelfInventory, WorldError> {
        self.shelves.get(&area).ok_or(WorldError::InvalidArea {
            area,
            max: SHELF_AREA_COUNT,
        })
    }

    /// Take one random item from the given area's shelf.
    ///
    /// # Errors
    ///
    /// Propagates [`WorldError::InvalidArea`], [`WorldError::Empty`] and
    /// [`WorldError::LockPoisoned`].
    pub fn take_from<R: Rng + ?Sized>(
        &self,
        area: AreaId,
        rng: &mut R,
    ) -> Result<ItemId, WorldError> {
        self.resolve(area)?.take_random(rng)
    }

    /// Items remaining on each shelf.
    pub fn remaining(&self) -> Result<BTreeMap<AreaId, usize>, WorldError> {
        let mut counts = BTreeMap::new();
        for (area, shelf) in &self.shelves {
            counts.insert(*area, shelf.len()?);
        }
        Ok(counts)
    }

    /// Total items remaining across all shelves.
    pub fn total_remaining(&self) -> Result<usize, WorldError> {
        let mut total: usize = 0;
        for shelf in self.shelves.values() {
            total = total.saturating_add(shelf.len()?);
        }
        Ok(total)
    }

    /// Iterate over the shelves in area order.
    pub fn shelves(&self) -> impl Iterator<Item = &ShelfInventory> {
        self.shelves.values()
    }
}

const fn is_valid_area(area: AreaId) -> bool {
    area.0 >= 1 && area.0 <= SHELF_AREA_COUNT
}
