#[cfg(feature = "shuttle")]
pub(crate) use shuttle::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        RwLock,
    },
    thread,
};
#[cfg(not(feature = "shuttle"))]
pub(crate) use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        RwLock,
    },
    thread,
};

#[cfg(all(test, feature = "shuttle"))]
pub(crate) use shuttle::sync::{RwLockReadGuard, RwLockWriteGuard};
#[cfg(all(test, not(feature = "shuttle")))]
pub(crate) use std::sync::{RwLockReadGuard, RwLockWriteGuard};
