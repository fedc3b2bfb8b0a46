use std::collections::BTreeSet;

/// Generatore di identificativi con riuso: gli id rilasciati vengono
/// riassegnati prima di emettere un nuovo id sequenziale, partendo
/// sempre dal più piccolo disponibile. Usato sia per le chat che per
/// i messaggi, con un'istanza indipendente per ciascuno.
#[derive(Debug)]
pub struct IdPool {
    free: BTreeSet<u64>,
    next: u64,
}

impl IdPool {
    pub fn new() -> Self {
        Self {
            free: BTreeSet::new(),
            next: 1,
        }
    }

    /// Restituisce il prossimo id disponibile
    pub fn next_id(&mut self) -> u64 {
        match self.free.pop_first() {
            Some(id) => id,
            None => {
                let id = self.next;
                self.next += 1;
                id
            }
        }
    }

    /// Rilascia un id per un futuro riuso. Rilasciare due volte lo stesso
    /// id, o un id mai emesso, non ha effetto.
    pub fn release(&mut self, id: u64) {
        if id < self.next {
            self.free.insert(id);
        }
    }
}

impl Default for IdPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids_start_at_one() {
        let mut pool = IdPool::new();
        assert_eq!(pool.next_id(), 1);
        assert_eq!(pool.next_id(), 2);
        assert_eq!(pool.next_id(), 3);
    }

    #[test]
    fn test_released_id_is_reused_first() {
        let mut pool = IdPool::new();
        for _ in 0..5 {
            pool.next_id();
        }
        pool.release(3);
        assert_eq!(pool.next_id(), 3);
        assert_eq!(pool.next_id(), 6);
    }

    #[test]
    fn test_smallest_released_id_wins() {
        let mut pool = IdPool::new();
        for _ in 0..5 {
            pool.next_id();
        }
        pool.release(4);
        pool.release(2);
        pool.release(5);
        assert_eq!(pool.next_id(), 2);
        assert_eq!(pool.next_id(), 4);
        assert_eq!(pool.next_id(), 5);
        assert_eq!(pool.next_id(), 6);
    }

    #[test]
    fn test_double_release_is_noop() {
        let mut pool = IdPool::new();
        pool.next_id();
        pool.next_id();
        pool.release(1);
        pool.release(1);
        assert_eq!(pool.next_id(), 1);
        // il secondo rilascio non deve produrre un duplicato
        assert_eq!(pool.next_id(), 3);
    }

    #[test]
    fn test_release_of_never_issued_id_is_noop() {
        let mut pool = IdPool::new();
        pool.next_id();
        pool.release(42);
        assert_eq!(pool.next_id(), 2);
    }

    #[test]
    fn test_no_id_outstanding_twice() {
        let mut pool = IdPool::new();
        let mut outstanding = std::collections::HashSet::new();
        for _ in 0..10 {
            assert!(outstanding.insert(pool.next_id()));
        }
        outstanding.remove(&7);
        pool.release(7);
        outstanding.remove(&2);
        pool.release(2);
        for _ in 0..4 {
            assert!(outstanding.insert(pool.next_id()));
        }
    }
}
