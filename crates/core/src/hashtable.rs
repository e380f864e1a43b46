//! Open-addressed hash table with linear probing and FNV-1a keys.

use crate::value::Value;
use tracing::trace;

const DEF_TABLE_SIZE: usize = 4;
const GROW_THRESH: f64 = 0.6;
const FNV_OFFSET_BIAS: u32 = 0x53c2_7916;
const FNV_PRIME: u32 = 0x811c_9dc5;

fn fnv1a(key: &str) -> u32 {
    let mut hash = FNV_OFFSET_BIAS;
    for byte in key.as_bytes() {
        hash ^= *byte as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[derive(Debug, Clone)]
enum Slot {
    Empty,
    /// A slot that once held a key but was vacated; probing must continue
    /// past it, but insertion may reuse it.
    Tombstone,
    Occupied(String, Value),
}

/// Global variable table: the table owns each key and value it holds.
#[derive(Debug, Clone)]
pub struct HashTable {
    slots: Vec<Slot>,
    len: usize,
}

impl HashTable {
    pub fn new() -> Self {
        Self {
            slots: (0..DEF_TABLE_SIZE).map(|_| Slot::Empty).collect(),
            len: 0,
        }
    }

    /// Like `new`, but the initial table has room for at least `capacity`
    /// entries before the first grow-and-rehash.
    pub fn with_capacity(capacity: usize) -> Self {
        let size = capacity.max(1);
        Self {
            slots: (0..size).map(|_| Slot::Empty).collect(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.find_slot(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.find_slot(key).map(|i| match &self.slots[i] {
            Slot::Occupied(_, v) => v,
            _ => unreachable!(),
        })
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        let idx = self.find_slot(key)?;
        match &mut self.slots[idx] {
            Slot::Occupied(_, v) => Some(v),
            _ => unreachable!(),
        }
    }

    /// Inserts or overwrites `key`. On overwrite, the old value is
    /// replaced and returned; the key slot itself is reused.
    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        if (self.len + 1) as f64 / self.capacity() as f64 > GROW_THRESH {
            self.grow();
        }
        let cap = self.capacity();
        let mut idx = (fnv1a(key) as usize) % cap;
        let mut first_tombstone: Option<usize> = None;
        for _ in 0..cap {
            match &self.slots[idx] {
                Slot::Occupied(k, _) if k == key => {
                    if let Slot::Occupied(_, old) = std::mem::replace(&mut self.slots[idx], Slot::Occupied(key.to_string(), value)) {
                        return Some(old);
                    }
                    unreachable!()
                }
                Slot::Empty => {
                    let target = first_tombstone.unwrap_or(idx);
                    self.slots[target] = Slot::Occupied(key.to_string(), value);
                    self.len += 1;
                    trace!(key, capacity = cap, len = self.len, "hashtable insert");
                    return None;
                }
                Slot::Tombstone => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(idx);
                    }
                }
                Slot::Occupied(..) => {}
            }
            idx = (idx + 1) % cap;
        }
        // Every slot probed without finding room; this can only happen if
        // `grow` failed to keep the load factor under threshold.
        self.grow();
        self.insert(key, value)
    }

    /// Removes `key`, freeing both the key and the value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let idx = self.find_slot(key)?;
        let old = std::mem::replace(&mut self.slots[idx], Slot::Tombstone);
        self.len -= 1;
        match old {
            Slot::Occupied(_, v) => Some(v),
            _ => unreachable!(),
        }
    }

    fn find_slot(&self, key: &str) -> Option<usize> {
        let cap = self.capacity();
        if cap == 0 {
            return None;
        }
        let mut idx = (fnv1a(key) as usize) % cap;
        for _ in 0..cap {
            match &self.slots[idx] {
                Slot::Occupied(k, _) if k == key => return Some(idx),
                Slot::Empty => return None,
                _ => {}
            }
            idx = (idx + 1) % cap;
        }
        None
    }

    fn grow(&mut self) {
        let new_cap = self.capacity() * 2;
        let old_slots = std::mem::replace(&mut self.slots, (0..new_cap).map(|_| Slot::Empty).collect());
        self.len = 0;
        for slot in old_slots {
            if let Slot::Occupied(k, v) = slot {
                self.insert(&k, v);
            }
        }
        trace!(new_capacity = new_cap, "hashtable grew");
    }
}

impl Default for HashTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_most_recent_insert() {
        let mut t = HashTable::new();
        t.insert("a", Value::Int(1));
        t.insert("a", Value::Int(2));
        assert_eq!(t.get("a"), Some(&Value::Int(2)));
    }

    #[test]
    fn lookup_of_absent_key_is_none() {
        let t = HashTable::new();
        assert_eq!(t.get("missing"), None);
    }

    #[test]
    fn grows_past_load_factor_and_preserves_all_entries() {
        let mut t = HashTable::new();
        for i in 0..50 {
            t.insert(&format!("k{i}"), Value::Int(i));
        }
        assert_eq!(t.len(), 50);
        assert!((t.len() as f64) < GROW_THRESH * t.capacity() as f64);
        for i in 0..50 {
            assert_eq!(t.get(&format!("k{i}")), Some(&Value::Int(i)));
        }
    }

    #[test]
    fn remove_then_reinsert_finds_value_again() {
        let mut t = HashTable::new();
        t.insert("x", Value::Int(1));
        t.remove("x");
        assert_eq!(t.get("x"), None);
        t.insert("x", Value::Int(2));
        assert_eq!(t.get("x"), Some(&Value::Int(2)));
    }
}
