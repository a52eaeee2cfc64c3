use vfs::FsError;

use crate::InodeIndexAllocator;
use crate::config::FIRST_INODE_INDEX;

#[test]
fn test_allocate_monotonic() {
    let mut alloc = InodeIndexAllocator::starting_at(FIRST_INODE_INDEX);
    assert_eq!(alloc.allocate(), Ok(1));
    assert_eq!(alloc.allocate(), Ok(2));
    assert_eq!(alloc.allocate(), Ok(3));
    assert_eq!(alloc.peek(), 4);
}

#[test]
fn test_allocate_exhausted() {
    let mut alloc = InodeIndexAllocator::starting_at(u64::MAX - 1);
    assert_eq!(alloc.allocate(), Ok(u64::MAX - 1));
    // u64::MAX 不会发出，计数器也不会回绕到 0
    assert_eq!(alloc.allocate(), Err(FsError::NoSpace));
    assert_eq!(alloc.allocate(), Err(FsError::NoSpace));
    assert_eq!(alloc.peek(), u64::MAX);
}
