//! Menu model and store.
//!
//! A [`Menu`] is a named, located tree of navigation items. [`MenuStore`]
//! provides CRUD over the menu collection and its nested [`MenuItem`] trees,
//! enforcing ordering and reserved-location invariants.
//!
//! # Persisted shape
//!
//! The canonical persisted shape is a JSON object keyed by menu id. A legacy
//! array shape is auto-migrated and rewritten on load; any other parse failure
//! falls back to the seeded defaults with a logged warning.
//!
//! # Failure semantics
//!
//! Operations on an unknown menu id return `Ok(false)` / `Ok(None)` rather
//! than an error. Persistence failures surface as [`MenuError::Store`].

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vellum_store::{KvStore, KvStoreExt, StoreError, keys};

/// Menu locations that are seeded by default and may not be deleted.
pub const RESERVED_LOCATIONS: [&str; 2] = ["primary", "footer"];

/// Link target policy for a menu item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkTarget {
    /// Open in the same tab.
    #[default]
    #[serde(rename = "same-tab")]
    SameTab,
    /// Open in a new tab.
    #[serde(rename = "new-tab")]
    NewTab,
}

/// One navigation link node, optionally with nested children.
///
/// `order` is a sort key unique within siblings, contiguous from 1. Children
/// are owned exclusively by their parent; ids are unique within one menu.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Opaque unique identifier, stable across edits.
    pub id: String,
    /// Display text.
    pub label: String,
    /// Target path or fragment.
    pub url: String,
    /// Optional symbolic icon name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Link target policy.
    #[serde(default)]
    pub target: LinkTarget,
    /// Sort key within siblings, contiguous from 1.
    pub order: u32,
    /// Identifier of the enclosing item, or none for top-level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Ordered child items.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

/// A named, located, ordered tree of navigation links.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    /// Opaque unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Symbolic slot such as `primary` or `footer-2`.
    pub location: String,
    /// Ordered top-level items.
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

/// Draft for a new menu item. Absent `id` and `order` are assigned on insert.
#[derive(Clone, Debug, Default)]
pub struct MenuItemDraft {
    /// Explicit id; generated when absent.
    pub id: Option<String>,
    /// Display text.
    pub label: String,
    /// Target path or fragment.
    pub url: String,
    /// Optional symbolic icon name.
    pub icon: Option<String>,
    /// Link target policy.
    pub target: LinkTarget,
    /// Explicit sort key; `sibling count + 1` when absent.
    pub order: Option<u32>,
    /// Parent item id; top-level when absent or unresolved.
    pub parent_id: Option<String>,
}

/// Partial update for a menu. `id` is always preserved.
#[derive(Clone, Debug, Default)]
pub struct MenuPatch {
    /// New display name.
    pub name: Option<String>,
    /// New location slot.
    pub location: Option<String>,
}

/// Partial update for a menu item. `id` and `children` are never overwritten.
#[derive(Clone, Debug, Default)]
pub struct MenuItemPatch {
    /// New display text.
    pub label: Option<String>,
    /// New target path.
    pub url: Option<String>,
    /// New icon name (`Some(None)` clears it).
    pub icon: Option<Option<String>>,
    /// New link target policy.
    pub target: Option<LinkTarget>,
    /// New sort key.
    pub order: Option<u32>,
}

/// Error from menu store operations.
#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    /// Missing required field on create.
    #[error("validation error: {0}")]
    Validation(String),

    /// Persistence layer failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The menu collection as persisted: object keyed by menu id.
type MenuMap = BTreeMap<String, Menu>;

/// CRUD over the menu collection and its nested item trees.
///
/// Holds the persistence port by reference; every mutation reads the whole
/// collection, applies the change in memory, and writes the whole collection
/// back (last writer wins).
pub struct MenuStore {
    store: Arc<dyn KvStore>,
}

impl MenuStore {
    /// Create a menu store over the given persistence port.
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Create a new menu with an empty item list and persist the collection.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Validation`] if `name` is empty, or
    /// [`MenuError::Store`] if persistence fails.
    pub fn create_menu(&self, name: &str, location: &str) -> Result<Menu, MenuError> {
        if name.trim().is_empty() {
            return Err(MenuError::Validation("menu name must not be empty".into()));
        }

        let mut menus = self.load();
        let menu = Menu {
            id: Uuid::new_v4().to_string(),
            name: name.to_owned(),
            location: location.to_owned(),
            items: Vec::new(),
        };
        menus.insert(menu.id.clone(), menu.clone());
        self.persist(&menus)?;
        Ok(menu)
    }

    /// Persist the current menu set, writing the seeded reserved menus on a
    /// fresh store.
    ///
    /// # Errors
    ///
    /// Returns [`MenuError::Store`] if persistence fails.
    pub fn seed_defaults(&self) -> Result<(), MenuError> {
        let menus = self.load();
        self.persist(&menus)?;
        Ok(())
    }

    /// Fetch a menu by id.
    pub fn get_menu(&self, id: &str) -> Option<Menu> {
        self.load().remove(id)
    }

    /// All menus, keyed by id.
    pub fn list_menus(&self) -> MenuMap {
        self.load()
    }

    /// Merge `patch` into the menu. Returns `Ok(false)` for an unknown id.
    pub fn update_menu(&self, id: &str, patch: &MenuPatch) -> Result<bool, MenuError> {
        let mut menus = self.load();
        let Some(menu) = menus.get_mut(id) else {
            return Ok(false);
        };

        if let Some(name) = &patch.name {
            menu.name.clone_from(name);
        }
        if let Some(location) = &patch.location {
            menu.location.clone_from(location);
        }

        self.persist(&menus)?;
        Ok(true)
    }

    /// Delete a menu. Refuses the reserved locations and unknown ids.
    pub fn delete_menu(&self, id: &str) -> Result<bool, MenuError> {
        let mut menus = self.load();
        let Some(menu) = menus.get(id) else {
            return Ok(false);
        };
        if RESERVED_LOCATIONS.contains(&menu.location.as_str()) {
            return Ok(false);
        }

        menus.remove(id);
        self.persist(&menus)?;
        Ok(true)
    }

    /// Add an item to a menu, under its parent when `parent_id` resolves,
    /// otherwise at the top level with `parent_id` cleared. Assigns `id` and
    /// `order` when absent.
    ///
    /// Returns `Ok(None)` for an unknown menu id.
    pub fn add_menu_item(
        &self,
        menu_id: &str,
        draft: MenuItemDraft,
    ) -> Result<Option<MenuItem>, MenuError> {
        let mut menus = self.load();
        let Some(menu) = menus.get_mut(menu_id) else {
            return Ok(None);
        };

        let MenuItemDraft {
            id,
            label,
            url,
            icon,
            target,
            order,
            parent_id,
        } = draft;
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());

        if let Some(pid) = parent_id.clone()
            && let Some(parent) = find_item_mut(&mut menu.items, &pid)
        {
            let order = order.unwrap_or_else(|| next_order(&parent.children));
            let item = MenuItem {
                id,
                label,
                url,
                icon,
                target,
                order,
                parent_id,
                children: Vec::new(),
            };
            parent.children.push(item.clone());
            self.persist(&menus)?;
            return Ok(Some(item));
        }

        // Unresolved parent falls back to the top level; the stored item
        // must not keep a parent reference its position contradicts.
        let order = order.unwrap_or_else(|| next_order(&menu.items));
        let item = MenuItem {
            id,
            label,
            url,
            icon,
            target,
            order,
            parent_id: None,
            children: Vec::new(),
        };
        menu.items.push(item.clone());

        self.persist(&menus)?;
        Ok(Some(item))
    }

    /// Merge `patch` into an item located by depth-first search across the
    /// whole tree. Never overwrites `id` or `children`.
    ///
    /// Returns `Ok(false)` when the menu or item is unknown; no write occurs.
    pub fn update_menu_item(
        &self,
        menu_id: &str,
        item_id: &str,
        patch: &MenuItemPatch,
    ) -> Result<bool, MenuError> {
        let mut menus = self.load();
        let Some(menu) = menus.get_mut(menu_id) else {
            return Ok(false);
        };
        let Some(item) = find_item_mut(&mut menu.items, item_id) else {
            return Ok(false);
        };

        if let Some(label) = &patch.label {
            item.label.clone_from(label);
        }
        if let Some(url) = &patch.url {
            item.url.clone_from(url);
        }
        if let Some(icon) = &patch.icon {
            item.icon.clone_from(icon);
        }
        if let Some(target) = patch.target {
            item.target = target;
        }
        if let Some(order) = patch.order {
            item.order = order;
        }

        self.persist(&menus)?;
        Ok(true)
    }

    /// Remove an item wherever it sits in the tree, together with its
    /// children. Returns `Ok(false)` when the menu or item is unknown.
    pub fn delete_menu_item(&self, menu_id: &str, item_id: &str) -> Result<bool, MenuError> {
        let mut menus = self.load();
        let Some(menu) = menus.get_mut(menu_id) else {
            return Ok(false);
        };
        if !remove_item(&mut menu.items, item_id) {
            return Ok(false);
        }

        self.persist(&menus)?;
        Ok(true)
    }

    /// Reassign `order = position + 1` for each matched id, in the given
    /// sequence. Unmatched ids are dropped silently.
    pub fn reorder_items(&self, menu_id: &str, ids: &[&str]) -> Result<bool, MenuError> {
        let mut menus = self.load();
        let Some(menu) = menus.get_mut(menu_id) else {
            return Ok(false);
        };

        let positions: HashMap<&str, u32> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, u32::try_from(i).unwrap_or(u32::MAX) + 1))
            .collect();
        apply_orders(&mut menu.items, &positions);

        self.persist(&menus)?;
        Ok(true)
    }

    /// Swap a top-level item with its previous sibling and renumber.
    /// No-op (`Ok(false)`) at the first position or for unknown ids.
    pub fn move_item_up(&self, menu_id: &str, item_id: &str) -> Result<bool, MenuError> {
        self.move_top_level(menu_id, item_id, -1)
    }

    /// Swap a top-level item with its next sibling and renumber.
    /// No-op (`Ok(false)`) at the last position or for unknown ids.
    pub fn move_item_down(&self, menu_id: &str, item_id: &str) -> Result<bool, MenuError> {
        self.move_top_level(menu_id, item_id, 1)
    }

    fn move_top_level(
        &self,
        menu_id: &str,
        item_id: &str,
        direction: i64,
    ) -> Result<bool, MenuError> {
        let mut menus = self.load();
        let Some(menu) = menus.get_mut(menu_id) else {
            return Ok(false);
        };

        // Work on the order-sorted view so "up" means visual position,
        // not array position.
        menu.items.sort_by_key(|item| item.order);
        let Some(pos) = menu.items.iter().position(|item| item.id == item_id) else {
            return Ok(false);
        };

        let target = i64::try_from(pos).unwrap_or(i64::MAX) + direction;
        if target < 0 || target >= i64::try_from(menu.items.len()).unwrap_or(i64::MAX) {
            return Ok(false);
        }
        let target = usize::try_from(target).unwrap_or(usize::MAX);

        menu.items.swap(pos, target);
        for (i, item) in menu.items.iter_mut().enumerate() {
            item.order = u32::try_from(i).unwrap_or(u32::MAX) + 1;
        }

        self.persist(&menus)?;
        Ok(true)
    }

    /// Load the menu collection, migrating or seeding as needed.
    ///
    /// Seeded defaults are not persisted here; they are written on the next
    /// mutation. A legacy array shape is rewritten immediately.
    fn load(&self) -> MenuMap {
        let raw = match self.store.get_raw(keys::MENUS) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default_menus(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read menu collection, using defaults");
                return default_menus();
            }
        };

        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) if value.is_object() => match serde_json::from_value::<MenuMap>(value) {
                Ok(menus) => menus,
                Err(e) => {
                    tracing::warn!(error = %e, "Corrupt menu collection, using defaults");
                    default_menus()
                }
            },
            Ok(value) if value.is_array() => match serde_json::from_value::<Vec<Menu>>(value) {
                Ok(list) => {
                    let menus: MenuMap =
                        list.into_iter().map(|m| (m.id.clone(), m)).collect();
                    tracing::info!(count = menus.len(), "Migrated legacy menu array to map");
                    if let Err(e) = self.persist(&menus) {
                        tracing::warn!(error = %e, "Failed to rewrite migrated menu collection");
                    }
                    menus
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Corrupt legacy menu array, using defaults");
                    default_menus()
                }
            },
            Ok(_) | Err(_) => {
                tracing::warn!("Corrupt menu collection, using defaults");
                default_menus()
            }
        }
    }

    fn persist(&self, menus: &MenuMap) -> Result<(), StoreError> {
        self.store.set_json(keys::MENUS, menus)
    }
}

/// The two reserved menus seeded on first use.
fn default_menus() -> MenuMap {
    let primary = Menu {
        id: "primary".to_owned(),
        name: "Primary Navigation".to_owned(),
        location: "primary".to_owned(),
        items: vec![MenuItem {
            id: "home".to_owned(),
            label: "Home".to_owned(),
            url: "/".to_owned(),
            icon: None,
            target: LinkTarget::SameTab,
            order: 1,
            parent_id: None,
            children: Vec::new(),
        }],
    };
    let footer = Menu {
        id: "footer".to_owned(),
        name: "Footer Navigation".to_owned(),
        location: "footer".to_owned(),
        items: Vec::new(),
    };
    [(primary.id.clone(), primary), (footer.id.clone(), footer)]
        .into_iter()
        .collect()
}

/// Next contiguous order value for a sibling list.
fn next_order(items: &[MenuItem]) -> u32 {
    u32::try_from(items.len()).unwrap_or(u32::MAX).saturating_add(1)
}

/// Depth-first search for an item by id.
fn find_item_mut<'a>(items: &'a mut [MenuItem], id: &str) -> Option<&'a mut MenuItem> {
    for item in items {
        if item.id == id {
            return Some(item);
        }
        if let Some(found) = find_item_mut(&mut item.children, id) {
            return Some(found);
        }
    }
    None
}

/// Remove an item by id wherever it sits in the tree.
fn remove_item(items: &mut Vec<MenuItem>, id: &str) -> bool {
    if let Some(pos) = items.iter().position(|item| item.id == id) {
        items.remove(pos);
        return true;
    }
    items
        .iter_mut()
        .any(|item| remove_item(&mut item.children, id))
}

/// Apply new order values across the whole tree.
fn apply_orders(items: &mut [MenuItem], positions: &HashMap<&str, u32>) {
    for item in items {
        if let Some(order) = positions.get(item.id.as_str()) {
            item.order = *order;
        }
        apply_orders(&mut item.children, positions);
    }
}
