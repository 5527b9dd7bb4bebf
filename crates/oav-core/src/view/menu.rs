use serde::Serialize;

/// What kind of entry a menu item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuItemKind {
    Group,
    Tag,
    Section,
    Operation,
}

/// Capabilities every navigable entry exposes to the menu.
pub trait MenuItem {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn depth(&self) -> usize;
    fn kind(&self) -> MenuItemKind;
    fn is_active(&self) -> bool;
    fn activate(&self);
    fn deactivate(&self);
    /// Child entries, in display order.
    fn items(&self) -> &[Box<dyn MenuItem + '_>] {
        &[]
    }
}

/// The grouping node an operation sits under, as far as the operation needs
/// to know about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupContext {
    pub id: String,
    pub depth: usize,
}

impl GroupContext {
    pub fn new(id: impl Into<String>, depth: usize) -> Self {
        Self {
            id: id.into(),
            depth,
        }
    }
}
