//! Symbol interning registry.
//!
//! Gives out one shared symbol per string key, so unrelated parts of a
//! program can agree on the same symbol-keyed property. Uses `RefCell`
//! since all access is single-threaded.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Symbol;

/// Interning table for shared symbols.
pub struct SymbolRegistry {
    map: RefCell<HashMap<String, Rc<Symbol>>>,
}

impl SymbolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            map: RefCell::new(HashMap::new()),
        }
    }

    /// The symbol registered under `key`, creating it on first use.
    pub fn for_key(&self, key: &str) -> Rc<Symbol> {
        if let Some(sym) = self.map.borrow().get(key) {
            return sym.clone();
        }
        let sym = Symbol::new(Some(key));
        self.map.borrow_mut().insert(key.to_string(), sym.clone());
        sym
    }

    /// Reverse lookup: the key a symbol was registered under, if any.
    pub fn key_for(&self, symbol: &Rc<Symbol>) -> Option<String> {
        let map = self.map.borrow();
        for (key, value) in map.iter() {
            if Rc::ptr_eq(value, symbol) {
                return Some(key.clone());
            }
        }
        None
    }
}

impl Default for SymbolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
