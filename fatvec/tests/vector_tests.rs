use fatvec::ErasedVec;

fn item(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

fn values(vec: &ErasedVec) -> Vec<u32> {
    vec.as_bytes()
        .chunks_exact(4)
        .map(|chunk| u32::from_le_bytes(chunk.try_into().unwrap()))
        .collect()
}

fn filled(values: &[u32]) -> ErasedVec {
    let mut vec = ErasedVec::with_capacity(4, values.len().max(1));
    for &value in values {
        vec.push(&item(value));
    }
    vec
}

#[test]
fn test_vector_initialization() {
    let vec = ErasedVec::with_capacity(4, 10);

    assert_eq!(vec.len(), 0);
    assert_eq!(vec.capacity(), 10);
    assert_eq!(vec.item_size(), 4);
    assert!(vec.is_empty());
    assert!(vec.get(0).is_none());
}

#[test]
fn test_push_and_get() {
    let mut vec = ErasedVec::new(4);

    for value in 0..100 {
        vec.push(&item(value));
    }

    assert_eq!(vec.len(), 100);
    assert!(vec.capacity() >= 100);
    for i in 0..100 {
        assert_eq!(vec.get(i as usize), Some(&item(i)[..]));
    }
    assert!(vec.get(100).is_none());
}

#[test]
fn test_append_scenario_with_remove() {
    let mut vec = ErasedVec::with_capacity(4, 2);

    vec.push(&item(10));
    vec.push(&item(20));
    vec.push(&item(30));

    assert_eq!(vec.capacity(), 4);
    assert_eq!(vec.len(), 3);
    assert_eq!(values(&vec), [10, 20, 30]);

    assert!(vec.remove(1));

    assert_eq!(values(&vec), [10, 30]);
    assert_eq!(vec.len(), 2);
    assert_eq!(vec.capacity(), 4);
}

#[test]
fn test_insert_shifts_right() {
    let mut vec = filled(&[1, 2, 3]);

    assert!(vec.insert(1, &item(9)));
    assert_eq!(values(&vec), [1, 9, 2, 3]);

    assert!(vec.insert(0, &item(0)));
    assert_eq!(values(&vec), [0, 1, 9, 2, 3]);

    // Inserting at `len` appends
    assert!(vec.insert(5, &item(7)));
    assert_eq!(values(&vec), [0, 1, 9, 2, 3, 7]);
}

#[test]
fn test_insert_out_of_range_is_ignored() {
    let mut vec = filled(&[1, 2, 3]);
    let before = vec.as_bytes().to_vec();
    let capacity = vec.capacity();

    assert!(!vec.insert(4, &item(9)));
    assert!(!vec.insert(usize::MAX, &item(9)));

    assert_eq!(vec.as_bytes(), &before[..]);
    assert_eq!(vec.len(), 3);
    assert_eq!(vec.capacity(), capacity);
}

#[test]
fn test_insert_into_full_vector_grows() {
    let mut vec = ErasedVec::with_capacity(4, 2);
    vec.push(&item(1));
    vec.push(&item(2));

    assert!(vec.insert(1, &item(5)));
    assert_eq!(vec.capacity(), 4);
    assert_eq!(values(&vec), [1, 5, 2]);
}

#[test]
fn test_remove_shifts_left() {
    let mut vec = filled(&[1, 2, 3, 4, 5]);

    assert!(vec.remove(0));
    assert_eq!(values(&vec), [2, 3, 4, 5]);

    assert!(vec.remove(3));
    assert_eq!(values(&vec), [2, 3, 4]);

    assert!(vec.remove(1));
    assert_eq!(values(&vec), [2, 4]);
}

#[test]
fn test_remove_out_of_range_is_ignored() {
    let mut vec = ErasedVec::new(4);
    assert!(!vec.remove(0));
    assert!(vec.is_empty());

    let mut vec = filled(&[1, 2]);
    assert!(!vec.remove(2));
    assert_eq!(values(&vec), [1, 2]);
}

#[test]
fn test_pop_operation() {
    let mut vec = filled(&[1, 2]);

    assert_eq!(vec.pop(), Some(&item(2)[..]));
    assert_eq!(vec.len(), 1);
    assert_eq!(vec.pop(), Some(&item(1)[..]));
    assert_eq!(vec.len(), 0);

    assert_eq!(vec.pop(), None);
    assert!(vec.is_empty());
}

#[test]
fn test_clear_operation() {
    let mut vec = filled(&[1, 2, 3]);
    let capacity = vec.capacity();

    vec.clear();

    assert_eq!(vec.len(), 0);
    assert!(vec.is_empty());
    assert_eq!(vec.capacity(), capacity);

    vec.push(&item(4));
    assert_eq!(values(&vec), [4]);
}

#[test]
fn test_get_mut_writes_in_place() {
    let mut vec = filled(&[1, 2, 3]);

    vec.get_mut(1).unwrap().copy_from_slice(&item(42));
    assert_eq!(values(&vec), [1, 42, 3]);
    assert!(vec.get_mut(3).is_none());

    vec.as_bytes_mut()[..4].copy_from_slice(&item(7));
    assert_eq!(values(&vec), [7, 42, 3]);
}

#[test]
fn test_duplicate_is_independent() {
    let mut original = filled(&[1, 2, 3]);
    let mut copy = original.duplicate();

    assert_eq!(copy, original);
    assert_eq!(copy.capacity(), original.capacity());
    assert_eq!(copy.item_size(), original.item_size());

    copy.push(&item(4));
    copy.get_mut(0).unwrap().copy_from_slice(&item(100));
    assert_eq!(values(&original), [1, 2, 3]);

    original.remove(0);
    assert_eq!(values(&copy), [100, 2, 3, 4]);
}

#[test]
fn test_duplicate_round_trip() {
    let vec = filled(&[5, 6, 7, 8]);
    let copy = vec.clone();

    for i in 0..vec.len() {
        assert_eq!(copy.get(i), vec.get(i));
    }
}

#[test]
fn test_swap_exchanges_storage() {
    let mut first = filled(&[1, 2]);
    let mut second = ErasedVec::with_capacity(2, 8);
    second.push(&[9, 9]);

    let first_ptr = first.as_ptr();
    let second_ptr = second.as_ptr();

    first.swap(&mut second);

    assert_eq!(first.item_size(), 2);
    assert_eq!(first.capacity(), 8);
    assert_eq!(first.get(0), Some(&[9u8, 9][..]));
    assert_eq!(values(&second), [1, 2]);
    assert_eq!(first.as_ptr(), second_ptr);
    assert_eq!(second.as_ptr(), first_ptr);
}

#[test]
fn test_non_growing_operations_keep_storage_in_place() {
    let mut vec = filled(&[1, 2, 3, 4]);
    let ptr = vec.as_ptr();

    vec.remove(1);
    vec.pop();
    vec.clear();
    vec.reserve(2);

    assert_eq!(vec.as_ptr(), ptr);
}

#[test]
#[should_panic(expected = "Item size mismatch: expected 4 bytes, got 3")]
fn test_push_wrong_item_size() {
    let mut vec = ErasedVec::new(4);
    vec.push(&[1, 2, 3]);
}

#[test]
fn test_large_items() {
    let mut vec = ErasedVec::with_capacity(1024, 1);
    let large = vec![b'x'; 1024];

    for _ in 0..10 {
        vec.push(&large);
    }

    assert_eq!(vec.len(), 10);
    assert_eq!(vec.capacity(), 16);
    assert!(vec.as_bytes().iter().all(|&b| b == b'x'));
}
