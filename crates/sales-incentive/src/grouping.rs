use std::collections::BTreeMap;

/// Splits `items` into key-ordered partitions, preserving input order inside each one.
pub(crate) fn partition_by<K, T, I, F>(items: I, key: F) -> BTreeMap<K, Vec<T>>
where
    K: Ord,
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> K,
{
    let mut partitions: BTreeMap<K, Vec<T>> = BTreeMap::new();
    for item in items {
        partitions.entry(key(&item)).or_default().push(item);
    }
    partitions
}
