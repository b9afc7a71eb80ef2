use std::sync::{Mutex, MutexGuard};
use subtrack_domain::{Entity, ID};

/// Useful functions for creating inmemory repositories

fn lock<T>(collection: &Mutex<Vec<T>>) -> MutexGuard<'_, Vec<T>> {
    // Recover from poisoning
    collection.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    lock(collection).push(val.clone());
}

/// Replaces the stored entity with the same id and returns whether it was found
pub fn save<T: Clone + Entity>(val: &T, collection: &Mutex<Vec<T>>) -> bool {
    update(val.id(), collection, |existing| *existing = val.clone())
}

pub fn find<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    lock(collection).iter().find(|e| e.id() == val_id).cloned()
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(collection: &Mutex<Vec<T>>, mut compare: F) -> Vec<T> {
    lock(collection)
        .iter()
        .filter(|item| compare(item))
        .cloned()
        .collect()
}

pub fn delete<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let mut collection = lock(collection);
    let index = collection.iter().position(|e| e.id() == val_id)?;
    Some(collection.remove(index))
}

/// Applies `update` to the entity with the given id and returns whether it was found
pub fn update<T: Entity, U: FnOnce(&mut T)>(val_id: &ID, collection: &Mutex<Vec<T>>, update: U) -> bool {
    match lock(collection).iter_mut().find(|e| e.id() == val_id) {
        Some(item) => {
            update(item);
            true
        }
        None => false,
    }
}
