use crate::ScaleKind;
use log::debug;
use std::collections::HashMap;
use wrfout::C;

/// Global (min, max) of whole time series, keyed by field and scale.
///
/// Entries are computed on first use and kept until explicitly
/// invalidated. Nothing is invalidated when the underlying file
/// changes, so a cache must not outlive the file it was filled from.
#[derive(Debug, Default)]
pub struct MinMaxCache {
    entries: HashMap<(String, ScaleKind), (C, C)>,
}

impl MinMaxCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str, kind: ScaleKind) -> Option<(C, C)> {
        self.entries.get(&(field.to_owned(), kind)).copied()
    }

    /// Returns the cached range, computing and storing it with `f` if
    /// absent. Errors from `f` are returned and nothing is stored.
    pub fn get_or_try_insert_with<E, F>(
        &mut self,
        field: &str,
        kind: ScaleKind,
        f: F,
    ) -> Result<(C, C), E>
    where
        F: FnOnce() -> Result<(C, C), E>,
    {
        if let Some(range) = self.get(field, kind) {
            return Ok(range);
        }
        let range = f()?;
        debug!("{field} {kind} range {range:?}");
        self.entries.insert((field.to_owned(), kind), range);
        Ok(range)
    }

    /// Drops every entry for `field`.
    pub fn invalidate(&mut self, field: &str) {
        self.entries.retain(|(name, _), _| name != field);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::MinMaxCache;
    use crate::ScaleKind;

    #[test]
    fn test_computed_once() {
        let mut cache = MinMaxCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            let range = cache
                .get_or_try_insert_with("T2", ScaleKind::Linear, || {
                    calls += 1;
                    Ok::<_, ()>((1.0, 2.0))
                })
                .unwrap();
            assert_eq!(range, (1.0, 2.0));
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_keyed_by_scale() {
        let mut cache = MinMaxCache::new();
        cache
            .get_or_try_insert_with("F", ScaleKind::Linear, || Ok::<_, ()>((-1.0, 1.0)))
            .unwrap();
        assert_eq!(cache.get("F", ScaleKind::Log), None);
        cache
            .get_or_try_insert_with("F", ScaleKind::Log, || Ok::<_, ()>((0.1, 1.0)))
            .unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_errors_are_not_stored() {
        let mut cache = MinMaxCache::new();
        let r = cache.get_or_try_insert_with("F", ScaleKind::Linear, || Err("boom"));
        assert_eq!(r, Err("boom"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate() {
        let mut cache = MinMaxCache::new();
        for field in ["A", "B"] {
            for kind in [ScaleKind::Linear, ScaleKind::Log] {
                cache
                    .get_or_try_insert_with(field, kind, || Ok::<_, ()>((0.0, 1.0)))
                    .unwrap();
            }
        }
        cache.invalidate("A");
        assert_eq!(cache.len(), 2);
        assert!(cache.get("B", ScaleKind::Log).is_some());
        cache.clear();
        assert!(cache.is_empty());
    }
}
