//! Selectable string lists backing the region and zone pickers.

/// An ordered list of strings with an optional current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringListModel {
    items: Vec<String>,
    current: Option<usize>,
}

impl StringListModel {
    pub fn new(items: Vec<String>) -> Self {
        Self {
            items,
            current: None,
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.items.get(index).map(String::as_str)
    }

    pub fn index_of(&self, item: &str) -> Option<usize> {
        self.items.iter().position(|i| i == item)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_item(&self) -> Option<&str> {
        self.current.and_then(|i| self.get(i))
    }

    /// Returns false, leaving the selection alone, if `index` is out of range.
    pub fn set_current_index(&mut self, index: Option<usize>) -> bool {
        match index {
            Some(i) if i >= self.items.len() => false,
            _ => {
                self.current = index;
                true
            }
        }
    }

    /// Replace the contents. The selection is cleared.
    pub fn set_items(&mut self, items: Vec<String>) {
        self.items = items;
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> StringListModel {
        StringListModel::new(vec!["Africa".into(), "America".into(), "Europe".into()])
    }

    #[test]
    fn test_selection() {
        let mut m = model();
        assert_eq!(m.current_item(), None);
        assert!(m.set_current_index(Some(2)));
        assert_eq!(m.current_item(), Some("Europe"));
        assert!(!m.set_current_index(Some(3)));
        assert_eq!(m.current_index(), Some(2));
        assert!(m.set_current_index(None));
        assert_eq!(m.current_item(), None);
    }

    #[test]
    fn test_set_items_clears_selection() {
        let mut m = model();
        m.set_current_index(Some(0));
        m.set_items(vec!["Berlin".into()]);
        assert_eq!(m.current_index(), None);
        assert_eq!(m.index_of("Berlin"), Some(0));
        assert_eq!(m.len(), 1);
    }
}
