use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Mappa associativa con chiavi non possedute: ogni chiave è un riferimento
/// debole e il confronto avviene per identità dell'oggetto puntato, non per
/// valore. Le chiavi i cui oggetti sono stati distrutti si comportano come
/// assenti; le voci morte restano nella struttura ma sono innocue.
///
/// È il registro di lettura delle chat: `chat.last_read[utente] = N`
/// significa "l'utente ha letto i primi N messaggi".
#[derive(Debug)]
pub struct WeakIndex<T, V> {
    entries: Vec<(Weak<RefCell<T>>, V)>,
}

impl<T, V> WeakIndex<T, V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserisce o sovrascrive il valore per la chiave data
    pub fn set(&mut self, key: &Rc<RefCell<T>>, value: V) {
        for (weak, stored) in &mut self.entries {
            if let Some(live) = weak.upgrade() {
                if Rc::ptr_eq(&live, key) {
                    *stored = value;
                    return;
                }
            }
        }
        self.entries.push((Rc::downgrade(key), value));
    }

    /// Valore per la chiave, se presente e se l'oggetto è ancora vivo
    pub fn get(&self, key: &Rc<RefCell<T>>) -> Option<&V> {
        self.entries.iter().find_map(|(weak, stored)| {
            let live = weak.upgrade()?;
            Rc::ptr_eq(&live, key).then_some(stored)
        })
    }

    /// Numero di voci con chiave ancora viva
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|(weak, _)| weak.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elimina le voci la cui chiave non esiste più. Ottimizzazione
    /// facoltativa, non necessaria per la correttezza.
    pub fn compact(&mut self) {
        self.entries.retain(|(weak, _)| weak.strong_count() > 0);
    }
}

impl<T, V> Default for WeakIndex<T, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(value: u32) -> Rc<RefCell<u32>> {
        Rc::new(RefCell::new(value))
    }

    #[test]
    fn test_set_then_get() {
        let mut index: WeakIndex<u32, usize> = WeakIndex::new();
        let key = boxed(7);
        index.set(&key, 3);
        assert_eq!(index.get(&key), Some(&3));
    }

    #[test]
    fn test_set_overwrites_existing_entry() {
        let mut index: WeakIndex<u32, usize> = WeakIndex::new();
        let key = boxed(7);
        index.set(&key, 1);
        index.set(&key, 9);
        assert_eq!(index.get(&key), Some(&9));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_identity_not_value_comparison() {
        let mut index: WeakIndex<u32, usize> = WeakIndex::new();
        let first = boxed(7);
        let twin = boxed(7);
        index.set(&first, 1);
        assert_eq!(index.get(&twin), None);
    }

    #[test]
    fn test_dead_key_behaves_as_absent() {
        let mut index: WeakIndex<u32, usize> = WeakIndex::new();
        let key = boxed(7);
        index.set(&key, 5);
        drop(key);

        let other = boxed(7);
        assert_eq!(index.get(&other), None);
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn test_compact_drops_dead_entries() {
        let mut index: WeakIndex<u32, usize> = WeakIndex::new();
        let keep = boxed(1);
        let gone = boxed(2);
        index.set(&keep, 1);
        index.set(&gone, 2);
        drop(gone);

        index.compact();
        assert_eq!(index.entries.len(), 1);
        assert_eq!(index.get(&keep), Some(&1));
    }
}
