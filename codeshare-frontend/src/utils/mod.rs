use rand::Rng;
use std::ops::Range;
use std::sync::{Mutex, MutexGuard};

/// Range of identifiers attached to a new upload. The upper bound is excluded.
pub const UPLOAD_ID_RANGE: Range<u32> = 1_000..100_000;

/// Draw an upload identifier uniformly from [`UPLOAD_ID_RANGE`].
pub fn generate_upload_id() -> u32 {
    generate_upload_id_with(&mut rand::thread_rng())
}

pub fn generate_upload_id_with<R: Rng>(rng: &mut R) -> u32 {
    rng.gen_range(UPLOAD_ID_RANGE)
}

/// Lock a std mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
