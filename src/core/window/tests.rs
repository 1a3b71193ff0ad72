#[cfg(test)]
mod tests {
    use crate::core::backend::NativeHandle;
    use crate::core::window::registry::WindowRegistry;
    use crate::core::window::{Archetype, WindowRecord};

    fn record(view_id: i64, archetype: Archetype) -> WindowRecord {
        WindowRecord::new(view_id, "test", archetype, NativeHandle::new(view_id as u64 + 1))
    }

    #[test]
    fn test_insert_lookup_remove() {
        let mut registry = WindowRegistry::new();
        assert!(registry.is_empty());

        registry.insert(record(1, Archetype::Regular));
        registry.insert(record(2, Archetype::Regular));
        assert_eq!(registry.len(), 2);
        assert!(registry.contains(1));
        assert!(registry.get(2).is_some());

        let removed = registry.remove(1);
        assert_eq!(removed.map(|r| r.view_id), Some(1));
        assert!(!registry.contains(1));
        assert!(registry.remove(1).is_none());
    }

    #[test]
    fn test_remove_detaches_popup_from_parent() {
        let mut registry = WindowRegistry::new();
        registry.insert(record(1, Archetype::Regular));

        let mut popup = record(2, Archetype::Popup);
        popup.parent = Some(1);
        registry.insert(popup);
        assert!(registry.attach_popup(1, 2));
        assert_eq!(registry.popups_of(1), vec![2]);

        registry.remove(2);
        assert!(registry.popups_of(1).is_empty());
    }

    #[test]
    fn test_attach_popup_to_missing_parent() {
        let mut registry = WindowRegistry::new();
        assert!(!registry.attach_popup(99, 2));
    }

    #[test]
    fn test_purge_closed_is_idempotent() {
        let mut registry = WindowRegistry::new();
        registry.insert(record(1, Archetype::Regular));
        registry.insert(record(2, Archetype::Regular));
        registry.insert(record(3, Archetype::Regular));

        // Simulate two windows whose native surfaces went away.
        registry.get_mut(1).unwrap().native_handle = None;
        registry.get_mut(3).unwrap().native_handle = None;

        registry.purge_closed();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(2));

        // Second purge with no intervening mutation is a no-op.
        registry.purge_closed();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_purge_detaches_closed_popups() {
        let mut registry = WindowRegistry::new();
        registry.insert(record(1, Archetype::Regular));
        let mut popup = record(2, Archetype::Popup);
        popup.parent = Some(1);
        registry.insert(popup);
        registry.attach_popup(1, 2);

        registry.get_mut(2).unwrap().native_handle = None;
        registry.purge_closed();
        assert!(registry.popups_of(1).is_empty());
        assert!(registry.contains(1));
    }

    #[test]
    fn test_quit_on_close_owner() {
        let mut registry = WindowRegistry::new();
        assert_eq!(registry.quit_on_close_owner(), None);

        let mut main = record(1, Archetype::Regular);
        main.quit_on_close = true;
        registry.insert(main);
        registry.insert(record(2, Archetype::Regular));
        assert_eq!(registry.quit_on_close_owner(), Some(1));
    }
}
