//! Shape-keyed caching of an expensive resource such as a GPU texture.

/// Holds one resource together with the dimensions it was created for.
///
/// [`ResourceCache::ensure`] recreates the resource only when the
/// dimensions change and otherwise updates it in place.
#[derive(Debug)]
pub struct ResourceCache<H> {
    last_width: u32,
    last_height: u32,
    handle: Option<H>,
}

impl<H> Default for ResourceCache<H> {
    fn default() -> Self {
        Self {
            last_width: 0,
            last_height: 0,
            handle: None,
        }
    }
}

impl<H> ResourceCache<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle valid for `width` x `height`.
    ///
    /// `create` runs when there is no handle yet or the shape changed;
    /// `update` runs on the existing handle otherwise.
    pub fn ensure(
        &mut self,
        width: u32,
        height: u32,
        create: impl FnOnce() -> H,
        update: impl FnOnce(&mut H),
    ) -> &mut H {
        let reusable = self.last_width == width && self.last_height == height;
        let handle = match self.handle.take() {
            Some(mut handle) if reusable => {
                update(&mut handle);
                handle
            }
            _ => {
                self.last_width = width;
                self.last_height = height;
                create()
            }
        };
        self.handle.insert(handle)
    }

    pub fn get(&self) -> Option<&H> {
        self.handle.as_ref()
    }

    /// Dimensions the current handle was created for.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.handle.as_ref().map(|_| (self.last_width, self.last_height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Handle {
        id: u32,
        updates: u32,
    }

    #[test]
    fn creates_once_then_updates() {
        let mut cache = ResourceCache::new();
        let mut next_id = 0;
        let mut create = || {
            next_id += 1;
            Handle { id: next_id, updates: 0 }
        };

        cache.ensure(4, 4, &mut create, |h| h.updates += 1);
        let handle = cache.ensure(4, 4, &mut create, |h| h.updates += 1);
        assert_eq!(*handle, Handle { id: 1, updates: 1 });
        assert_eq!(cache.dimensions(), Some((4, 4)));
    }

    #[test]
    fn shape_change_recreates() {
        let mut cache = ResourceCache::new();
        cache.ensure(4, 4, || Handle { id: 1, updates: 0 }, |h| h.updates += 1);
        let handle = cache.ensure(4, 5, || Handle { id: 2, updates: 0 }, |h| h.updates += 1);
        assert_eq!(handle.id, 2);
        assert_eq!(handle.updates, 0);
        assert_eq!(cache.dimensions(), Some((4, 5)));
    }

    #[test]
    fn empty_cache_has_nothing() {
        let cache: ResourceCache<Handle> = ResourceCache::new();
        assert!(cache.get().is_none());
        assert_eq!(cache.dimensions(), None);
    }
}
