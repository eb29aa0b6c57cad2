//! Generation-tagged slot storage backing [`crate::Register`].
//!
//! Elements keep their slot (and handle) for their whole lifetime. Slots are
//! never reused, so slot order is insertion order, which is also the
//! positional order used on the wire.

use std::marker::PhantomData;

use crate::model::{BlockId, ConnectionId};

/// Handle types that address an [`Arena`] slot.
pub(crate) trait SlotKey: Copy {
    /// Builds a handle for slot `index` at `generation`.
    fn from_parts(index: u32, generation: u32) -> Self;
    /// Slot index the handle points at.
    fn slot(self) -> u32;
    /// Generation the slot must still carry for the handle to resolve.
    fn slot_generation(self) -> u32;
}

impl SlotKey for BlockId {
    fn from_parts(index: u32, generation: u32) -> Self {
        BlockId::new(index, generation)
    }
    fn slot(self) -> u32 {
        self.index()
    }
    fn slot_generation(self) -> u32 {
        self.generation()
    }
}

impl SlotKey for ConnectionId {
    fn from_parts(index: u32, generation: u32) -> Self {
        ConnectionId::new(index, generation)
    }
    fn slot(self) -> u32 {
        self.index()
    }
    fn slot_generation(self) -> u32 {
        self.generation()
    }
}

#[derive(Debug, Clone)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Append-only slot map with generation-checked handles.
///
/// Removal leaves a hole. `clear` drops every slot and moves to a new
/// generation, so handles issued before it never resolve again.
#[derive(Debug, Clone)]
pub(crate) struct Arena<K, T> {
    slots: Vec<Slot<T>>,
    generation: u32,
    len: usize,
    _key: PhantomData<K>,
}

impl<K, T> Default for Arena<K, T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            generation: 0,
            len: 0,
            _key: PhantomData,
        }
    }
}

impl<K: SlotKey, T> Arena<K, T> {
    /// Creates an empty arena with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Returns the number of live elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if there are no live elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends `value` in a new slot after every existing element.
    pub fn insert(&mut self, value: T) -> K {
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: self.generation,
            value: Some(value),
        });
        self.len += 1;
        K::from_parts(index, self.generation)
    }

    /// Returns the element for `key`, if the handle is still live.
    #[inline]
    pub fn get(&self, key: K) -> Option<&T> {
        self.slots
            .get(key.slot() as usize)
            .filter(|slot| slot.generation == key.slot_generation())
            .and_then(|slot| slot.value.as_ref())
    }

    /// Returns the element for `key` mutably, if the handle is still live.
    #[inline]
    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.slots
            .get_mut(key.slot() as usize)
            .filter(|slot| slot.generation == key.slot_generation())
            .and_then(|slot| slot.value.as_mut())
    }

    /// Returns true if `key` resolves to a live element.
    #[inline]
    pub fn contains(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// Removes and returns the element for `key`, retiring the handle.
    pub fn remove(&mut self, key: K) -> Option<T> {
        let slot = self.slots.get_mut(key.slot() as usize)?;
        if slot.generation != key.slot_generation() {
            return None;
        }
        let value = slot.value.take()?;
        self.len -= 1;
        Some(value)
    }

    /// Removes every element. All outstanding handles are retired.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.generation = self.generation.wrapping_add(1);
        self.len = 0;
    }

    /// Iterates live elements in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value
                .as_ref()
                .map(|value| (K::from_parts(index as u32, slot.generation), value))
        })
    }

    /// Iterates live elements mutably in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (K, &mut T)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value
                .as_mut()
                .map(|value| (K::from_parts(index as u32, generation), value))
        })
    }

    /// Iterates live handles in slot order.
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Returns the handle of the `position`-th live element.
    pub fn key_at(&self, position: usize) -> Option<K> {
        if position >= self.len {
            return None;
        }
        self.keys().nth(position)
    }

    /// Returns the positional index of `key` among live elements.
    pub fn position_of(&self, key: K) -> Option<usize> {
        if !self.contains(key) {
            return None;
        }
        let index = key.slot() as usize;
        Some(
            self.slots[..index]
                .iter()
                .filter(|slot| slot.value.is_some())
                .count(),
        )
    }
}
