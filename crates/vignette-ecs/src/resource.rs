use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Type-map storage for singleton resources shared between systems.
#[derive(Default)]
pub struct Resources {
    map: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Resources {
    /// Insert a resource, returning the value it replaced.
    pub fn insert<T: 'static + Send + Sync>(&mut self, value: T) -> Option<T> {
        self.map
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast().ok())
            .map(|old| *old)
    }

    pub fn get<T: 'static + Send + Sync>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|b| b.downcast_ref())
    }

    pub fn get_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut T> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|b| b.downcast_mut())
    }

    pub fn remove<T: 'static + Send + Sync>(&mut self) -> Option<T> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|b| b.downcast().ok())
            .map(|b| *b)
    }

    pub fn contains<T: 'static + Send + Sync>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_replace() {
        let mut res = Resources::default();
        assert_eq!(res.insert(1u32), None);
        assert_eq!(res.insert(2u32), Some(1));
        assert_eq!(res.get::<u32>(), Some(&2));
    }

    #[test]
    fn mutate_in_place() {
        let mut res = Resources::default();
        res.insert(vec![1, 2, 3]);
        if let Some(list) = res.get_mut::<Vec<i32>>() {
            list.push(4);
        }
        assert_eq!(res.get::<Vec<i32>>().map(Vec::len), Some(4));
    }

    #[test]
    fn remove_resource() {
        let mut res = Resources::default();
        res.insert("queue".to_string());
        assert_eq!(res.remove::<String>(), Some("queue".to_string()));
        assert!(!res.contains::<String>());
        assert_eq!(res.remove::<String>(), None);
    }
}
