//! Account store port - the shared email -> profile registry

use crate::domain::result::Result;
use crate::domain::AccountBook;

/// Storage for the whole account registry
///
/// The registry is always read and written as one unit; there is no
/// per-profile update.
pub trait AccountStore: Send + Sync {
    /// Load every profile. A store that was never written is empty.
    fn load(&self) -> Result<AccountBook>;

    /// Replace the stored registry with `book`
    fn save(&self, book: &AccountBook) -> Result<()>;

    /// Read-modify-write as one exclusive step
    ///
    /// `apply` sees the current registry; the result is saved only when it
    /// returns `Ok`. Concurrent callers are serialized.
    fn update(&self, apply: &mut dyn FnMut(&mut AccountBook) -> Result<()>) -> Result<()>;
}
