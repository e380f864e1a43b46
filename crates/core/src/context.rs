//! `Context`: the (named call stack, global hash table) pair the compiler
//! and VM both operate against.

use crate::hashtable::HashTable;
use crate::stack::NamedStack;
use crate::value::Value;

/// Where a name resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A non-negative call-stack slot index.
    Stack(usize),
    /// Found in the global table.
    Global,
    /// Not found anywhere.
    NotFound,
}

#[derive(Debug, Clone, Default)]
pub struct Context {
    pub stack: NamedStack,
    pub globals: HashTable,
}

impl Context {
    pub fn new() -> Self {
        Self {
            stack: NamedStack::new(),
            globals: HashTable::new(),
        }
    }

    /// Like `new`, but the stack and global table are pre-sized per a
    /// loaded `RunConfig` instead of starting from the library defaults.
    pub fn with_capacities(stack_capacity: usize, table_capacity: usize) -> Self {
        Self {
            stack: NamedStack::with_capacity(stack_capacity),
            globals: HashTable::with_capacity(table_capacity),
        }
    }

    /// Name lookup: call stack first, then globals.
    pub fn lookup(&self, name: &str) -> Resolution {
        if let Some(slot) = self.stack.lookup(name) {
            return Resolution::Stack(slot);
        }
        if self.globals.contains(name) {
            return Resolution::Global;
        }
        Resolution::NotFound
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.lookup(name) {
            Resolution::Stack(slot) => self.stack.get(slot as i64).ok(),
            Resolution::Global => self.globals.get(name),
            Resolution::NotFound => None,
        }
    }
}
