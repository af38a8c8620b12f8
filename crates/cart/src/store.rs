//! Cart line persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use salecart_core::{CartLineId, DomainError, DomainResult};

use crate::line::{CartLine, CartLineState};

/// Record store for cart lines.
///
/// Each call runs in the store's own transaction; batch writes are all or
/// nothing.
pub trait CartStore: Send + Sync {
    fn create(&self, line: CartLine) -> DomainResult<CartLine>;

    fn get(&self, id: CartLineId) -> DomainResult<CartLine>;

    /// Lines for `ids`, in the order given.
    fn browse(&self, ids: &[CartLineId]) -> DomainResult<Vec<CartLine>>;

    /// Overwrite an existing line.
    fn save(&self, line: &CartLine) -> DomainResult<()>;

    fn write_state(&self, ids: &[CartLineId], state: CartLineState) -> DomainResult<()>;

    fn delete(&self, ids: &[CartLineId]) -> DomainResult<()>;

    /// All lines in listing order.
    fn search(&self) -> DomainResult<Vec<CartLine>>;
}

/// In-memory cart store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    lines: RwLock<HashMap<CartLineId, CartLine>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn missing(id: CartLineId) -> DomainError {
        DomainError::not_found(format!("cart line {id}"))
    }

    fn poisoned() -> DomainError {
        DomainError::persistence("lock poisoned")
    }
}

impl CartStore for InMemoryCartStore {
    fn create(&self, line: CartLine) -> DomainResult<CartLine> {
        let mut lines = self.lines.write().map_err(|_| Self::poisoned())?;
        if lines.contains_key(&line.id()) {
            return Err(DomainError::persistence(format!(
                "cart line {} already exists",
                line.id()
            )));
        }
        lines.insert(line.id(), line.clone());
        Ok(line)
    }

    fn get(&self, id: CartLineId) -> DomainResult<CartLine> {
        let lines = self.lines.read().map_err(|_| Self::poisoned())?;
        lines.get(&id).cloned().ok_or_else(|| Self::missing(id))
    }

    fn browse(&self, ids: &[CartLineId]) -> DomainResult<Vec<CartLine>> {
        let lines = self.lines.read().map_err(|_| Self::poisoned())?;
        ids.iter()
            .map(|id| lines.get(id).cloned().ok_or_else(|| Self::missing(*id)))
            .collect()
    }

    fn save(&self, line: &CartLine) -> DomainResult<()> {
        let mut lines = self.lines.write().map_err(|_| Self::poisoned())?;
        let stored = lines
            .get_mut(&line.id())
            .ok_or_else(|| Self::missing(line.id()))?;
        *stored = line.clone();
        Ok(())
    }

    fn write_state(&self, ids: &[CartLineId], state: CartLineState) -> DomainResult<()> {
        let mut lines = self.lines.write().map_err(|_| Self::poisoned())?;
        if let Some(id) = ids.iter().find(|id| !lines.contains_key(*id)) {
            return Err(Self::missing(*id));
        }
        for id in ids {
            if let Some(line) = lines.get_mut(id) {
                line.set_state(state);
            }
        }
        Ok(())
    }

    fn delete(&self, ids: &[CartLineId]) -> DomainResult<()> {
        let mut lines = self.lines.write().map_err(|_| Self::poisoned())?;
        if let Some(id) = ids.iter().find(|id| !lines.contains_key(*id)) {
            return Err(Self::missing(*id));
        }
        for id in ids {
            lines.remove(id);
        }
        Ok(())
    }

    fn search(&self) -> DomainResult<Vec<CartLine>> {
        let lines = self.lines.read().map_err(|_| Self::poisoned())?;
        let mut all: Vec<CartLine> = lines.values().cloned().collect();
        all.sort_by(CartLine::listing_order);
        Ok(all)
    }
}
