//! The string-keyed open-addressing table.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::BuildHasher;
use core::iter::FusedIterator;

use crate::error::TableError;
use crate::grow;
use crate::hasher::hash_key;
use crate::layout::Columns;
use crate::layout::State;
use crate::probe;

/// The value [`Table::get`] returns for a key that is not present.
///
/// This is the NaN-boxed "undefined" bit pattern. It is excluded from the
/// value domain: storing it is a contract violation, since a later lookup
/// could not tell the stored value from a miss.
pub const UNDEFINED: u64 = 0xfffc_0000_0000_0000;

/// Key prefix marking a label, skipped by [`Table::merge_non_labels`].
pub const LABEL_PREFIX: &[u8] = b"@::";

/// A hash table from borrowed byte-string keys to `u64` values.
///
/// The table uses open addressing with linear probing over four parallel
/// columns (keys, values, cached hashes and slot states), always a power of
/// two long. Removed entries leave tombstones that keep probe chains intact
/// and are reused by later inserts. Before every insert the table rehashes
/// into twice the capacity once Filled plus Deleted slots exceed the load
/// factor; it never shrinks.
///
/// Keys are borrowed for `'k`, not copied. Anything implementing
/// `AsRef<[u8]>` can be used as a key, and keys compare by their bytes, so
/// `"abc"` and `b"abc"` name the same entry. The empty key is valid.
///
/// Lookups signal a miss with [`UNDEFINED`] rather than an `Option`.
///
/// ## Example
///
/// ```rust
/// use lintab::DefaultHashBuilder;
/// use lintab::Table;
/// use lintab::UNDEFINED;
///
/// let mut table: Table<'_, DefaultHashBuilder> = Table::new();
/// table.insert("key1", 100);
/// table.insert("key2", 200);
/// table.insert("key3", 300);
///
/// assert_eq!(table.get("key1"), 100);
/// assert_eq!(table.get("key4"), UNDEFINED);
///
/// table.remove("key2");
/// assert_eq!(table.get("key2"), UNDEFINED);
/// assert_eq!(table.len(), 2);
/// ```
#[derive(Clone)]
pub struct Table<'k, S> {
    pub(crate) columns: Columns<'k>,
    pub(crate) size: usize,
    pub(crate) tombstones: usize,
    hash_builder: S,
}

impl<'k, S> Debug for Table<'k, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Table")
            .field("size", &self.size)
            .field("tombstones", &self.tombstones)
            .field("capacity", &self.columns.capacity())
            .field(
                "states",
                &self
                    .columns
                    .states
                    .chunks(64)
                    .map(|row| {
                        row.iter()
                            .map(|state| match state {
                                State::Empty => '.',
                                State::Filled => '#',
                                State::Deleted => 'x',
                            })
                            .collect::<String>()
                    })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl<'k, S> Table<'k, S>
where
    S: BuildHasher + Default,
{
    /// Creates an empty table with [`INITIAL_CAPACITY`](crate::INITIAL_CAPACITY)
    /// slots and the default hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lintab::DefaultHashBuilder;
    /// use lintab::Table;
    ///
    /// let table: Table<'_, DefaultHashBuilder> = Table::new();
    /// assert!(table.is_empty());
    /// assert_eq!(table.capacity(), lintab::INITIAL_CAPACITY);
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Like [`new`](Self::new), but reports allocation failure.
    pub fn try_new() -> Result<Self, TableError> {
        Self::try_with_hasher(S::default())
    }

    /// Creates an empty table that holds at least `entries` entries before
    /// its first rehash.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lintab::DefaultHashBuilder;
    /// use lintab::Table;
    ///
    /// let table: Table<'_, DefaultHashBuilder> = Table::with_capacity(5000);
    /// assert!(table.capacity() >= 5000);
    /// assert!(table.capacity().is_power_of_two());
    /// ```
    pub fn with_capacity(entries: usize) -> Self {
        Self::with_capacity_and_hasher(entries, S::default())
    }
}

impl<'k, S> Default for Table<'k, S>
where
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'k, S> Table<'k, S> {
    /// Returns a reference to the table's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Returns the number of entries in the table.
    ///
    /// This is a counter maintained by every mutation, not a scan.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the table contains no entries.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of slots. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.columns.capacity()
    }

    /// Returns the number of tombstones left by removals since the last
    /// rehash.
    pub fn tombstones(&self) -> usize {
        self.tombstones
    }

    /// Returns an iterator over `(key, value)` pairs in slot order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lintab::DefaultHashBuilder;
    /// use lintab::Table;
    ///
    /// let mut table: Table<'_, DefaultHashBuilder> = Table::new();
    /// table.insert("a", 1);
    /// table.insert("b", 2);
    ///
    /// let mut sum = 0;
    /// for (_key, value) in table.iter() {
    ///     sum += value;
    /// }
    /// assert_eq!(sum, 3);
    /// ```
    pub fn iter(&self) -> Iter<'_, 'k> {
        Iter {
            columns: &self.columns,
            index: 0,
            remaining: self.size,
        }
    }
}

impl<'k, S> Table<'k, S>
where
    S: BuildHasher,
{
    /// Creates an empty table with [`INITIAL_CAPACITY`](crate::INITIAL_CAPACITY)
    /// slots that hashes keys with `hash_builder`.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::try_with_hasher(hash_builder).unwrap_or_else(|err| err.abort())
    }

    /// Like [`with_hasher`](Self::with_hasher), but reports allocation failure.
    pub fn try_with_hasher(hash_builder: S) -> Result<Self, TableError> {
        Self::try_with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates an empty table that holds at least `entries` entries before
    /// its first rehash, hashing keys with `hash_builder`.
    pub fn with_capacity_and_hasher(entries: usize, hash_builder: S) -> Self {
        Self::try_with_capacity_and_hasher(entries, hash_builder).unwrap_or_else(|err| err.abort())
    }

    /// Like [`with_capacity_and_hasher`](Self::with_capacity_and_hasher), but
    /// reports allocation failure.
    pub fn try_with_capacity_and_hasher(entries: usize, hash_builder: S) -> Result<Self, TableError> {
        let capacity = grow::capacity_for(entries)?;
        Ok(Self {
            columns: Columns::try_with_capacity(capacity)?,
            size: 0,
            tombstones: 0,
            hash_builder,
        })
    }

    /// Inserts `value` under `key`, replacing the value of an existing equal
    /// key.
    ///
    /// The table may rehash into a larger capacity first. Allocation failure
    /// aborts through [`handle_alloc_error`](alloc::alloc::handle_alloc_error);
    /// use [`try_insert`](Self::try_insert) to observe it instead.
    ///
    /// `value` must not be [`UNDEFINED`]. Debug builds assert this.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lintab::DefaultHashBuilder;
    /// use lintab::Table;
    ///
    /// let mut table: Table<'_, DefaultHashBuilder> = Table::new();
    /// table.insert("k", 1);
    /// table.insert("k", 2);
    /// assert_eq!(table.get("k"), 2);
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn insert<K>(&mut self, key: &'k K, value: u64)
    where
        K: AsRef<[u8]> + ?Sized,
    {
        if let Err(err) = self.try_insert(key, value) {
            err.abort();
        }
    }

    /// Inserts `value` under `key`, reporting allocation failure during the
    /// rehash that may precede it.
    ///
    /// On error the table is unchanged.
    pub fn try_insert<K>(&mut self, key: &'k K, value: u64) -> Result<(), TableError>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        debug_assert_ne!(value, UNDEFINED, "UNDEFINED cannot be stored in a table");

        self.maybe_grow()?;

        let key = key.as_ref();
        let hash = hash_key(&self.hash_builder, key);
        self.insert_hashed(hash, key, value);
        Ok(())
    }

    #[inline]
    fn insert_hashed(&mut self, hash: u64, key: &'k [u8], value: u64) {
        let index = probe::find_insert_slot(&self.columns, hash, key);
        match self.columns.states[index] {
            State::Filled => {}
            State::Empty => self.size += 1,
            State::Deleted => {
                self.size += 1;
                self.tombstones -= 1;
            }
        }
        self.columns.fill(index, hash, key, value);
    }

    /// Returns the value stored under `key`, or [`UNDEFINED`] if there is
    /// none.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lintab::DefaultHashBuilder;
    /// use lintab::Table;
    /// use lintab::UNDEFINED;
    ///
    /// let mut table: Table<'_, DefaultHashBuilder> = Table::new();
    /// table.insert("", 42);
    /// assert_eq!(table.get(""), 42);
    /// assert_eq!(table.get(b"missing"), UNDEFINED);
    /// ```
    pub fn get<K>(&self, key: &K) -> u64
    where
        K: AsRef<[u8]> + ?Sized,
    {
        match self.find(key.as_ref()) {
            Some(index) => self.columns.values[index],
            None => UNDEFINED,
        }
    }

    /// Returns `true` if the table holds an entry for `key`.
    pub fn contains_key<K>(&self, key: &K) -> bool
    where
        K: AsRef<[u8]> + ?Sized,
    {
        self.find(key.as_ref()).is_some()
    }

    #[inline]
    fn find(&self, key: &[u8]) -> Option<usize> {
        let hash = hash_key(&self.hash_builder, key);
        probe::find(&self.columns, hash, key)
    }

    /// Removes the entry for `key`, leaving a tombstone in its slot.
    ///
    /// Returns `true` if an entry was removed. Removing an absent key is a
    /// no-op.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lintab::DefaultHashBuilder;
    /// use lintab::Table;
    ///
    /// let mut table: Table<'_, DefaultHashBuilder> = Table::new();
    /// table.insert("k", 1);
    /// assert!(table.remove("k"));
    /// assert!(!table.remove("k"));
    /// assert_eq!(table.tombstones(), 1);
    /// ```
    pub fn remove<K>(&mut self, key: &K) -> bool
    where
        K: AsRef<[u8]> + ?Sized,
    {
        match self.find(key.as_ref()) {
            Some(index) => {
                self.columns.states[index] = State::Deleted;
                self.size -= 1;
                self.tombstones += 1;
                true
            }
            None => false,
        }
    }

    /// Inserts every entry of `src` into `self`. Where both tables hold a
    /// key, `src`'s value wins.
    ///
    /// The two tables may use different hashers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lintab::DefaultHashBuilder;
    /// use lintab::Table;
    ///
    /// let mut dst: Table<'_, DefaultHashBuilder> = Table::new();
    /// dst.insert("a", 1);
    ///
    /// let mut src: Table<'_, DefaultHashBuilder> = Table::new();
    /// src.insert("a", 2);
    /// src.insert("b", 3);
    ///
    /// dst.merge(&src);
    /// assert_eq!(dst.get("a"), 2);
    /// assert_eq!(dst.get("b"), 3);
    /// assert_eq!(dst.len(), 2);
    /// ```
    pub fn merge<S2>(&mut self, src: &Table<'k, S2>) {
        for (key, value) in src.iter() {
            self.insert(key, value);
        }
    }

    /// Like [`merge`](Self::merge), but skips keys starting with
    /// [`LABEL_PREFIX`] (`@::`).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lintab::DefaultHashBuilder;
    /// use lintab::Table;
    ///
    /// let mut src: Table<'_, DefaultHashBuilder> = Table::new();
    /// src.insert("name", 1);
    /// src.insert("@::label", 2);
    ///
    /// let mut dst: Table<'_, DefaultHashBuilder> = Table::new();
    /// dst.merge_non_labels(&src);
    /// assert!(dst.contains_key("name"));
    /// assert!(!dst.contains_key("@::label"));
    /// ```
    pub fn merge_non_labels<S2>(&mut self, src: &Table<'k, S2>) {
        for (key, value) in src.iter() {
            if !key.starts_with(LABEL_PREFIX) {
                self.insert(key, value);
            }
        }
    }

    /// Grows the table so that `additional` more keys can be inserted without
    /// a rehash. Never shrinks; a rehash triggered here also clears
    /// tombstones.
    pub fn reserve(&mut self, additional: usize) {
        if let Err(err) = self.try_reserve(additional) {
            err.abort();
        }
    }

    /// Like [`reserve`](Self::reserve), but reports allocation failure.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TableError> {
        let occupied = (self.size + self.tombstones)
            .checked_add(additional)
            .ok_or(TableError::CapacityOverflow)?;
        if occupied <= grow::max_load(self.capacity()) {
            return Ok(());
        }

        let required = self
            .size
            .checked_add(additional)
            .ok_or(TableError::CapacityOverflow)?;
        let capacity = grow::capacity_for(required)?.max(self.capacity());
        self.rehash(capacity)
    }

    #[inline]
    fn maybe_grow(&mut self) -> Result<(), TableError> {
        if grow::needs_grow(self.size, self.tombstones, self.capacity()) {
            let capacity = grow::next_capacity(self.capacity())?;
            self.rehash(capacity)?;
        }
        Ok(())
    }

    /// Moves every live entry into freshly allocated columns of `capacity`
    /// slots. Tombstones do not survive.
    #[cold]
    fn rehash(&mut self, capacity: usize) -> Result<(), TableError> {
        let mut columns = Columns::try_with_capacity(capacity)?;

        let old = &self.columns;
        for (index, state) in old.states.iter().enumerate() {
            if *state != State::Filled {
                continue;
            }
            let hash = old.hashes[index];
            let key = old.keys[index];
            let target = probe::find_insert_slot(&columns, hash, key);
            columns.fill(target, hash, key, old.values[index]);
        }

        self.columns = columns;
        self.tombstones = 0;
        Ok(())
    }
}

impl<'k, K, S> Extend<(&'k K, u64)> for Table<'k, S>
where
    K: AsRef<[u8]> + ?Sized + 'k,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (&'k K, u64)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'k, K, S> FromIterator<(&'k K, u64)> for Table<'k, S>
where
    K: AsRef<[u8]> + ?Sized + 'k,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (&'k K, u64)>>(iter: I) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<'a, 'k, S> IntoIterator for &'a Table<'k, S> {
    type Item = (&'k [u8], u64);
    type IntoIter = Iter<'a, 'k>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of a [`Table`] in slot order.
///
/// Created by [`Table::iter`].
pub struct Iter<'a, 'k> {
    columns: &'a Columns<'k>,
    index: usize,
    remaining: usize,
}

impl<'a, 'k> Iterator for Iter<'a, 'k> {
    type Item = (&'k [u8], u64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        while self.index < self.columns.capacity() {
            let index = self.index;
            self.index += 1;
            if self.columns.states[index] == State::Filled {
                self.remaining -= 1;
                return Some((self.columns.keys[index], self.columns.values[index]));
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_, '_> {}

impl FusedIterator for Iter<'_, '_> {}
