//! Binary parsing utils.
//!
//! This module should not be used directly, unless you're planning to parse
//! some tables manually.

use core::convert::{TryFrom, TryInto};

/// A trait for parsing raw binary data of fixed size.
///
/// This is a low-level, internal trait that should not be used directly.
pub trait FromData: Sized {
    /// Object's raw data size.
    ///
    /// Not always the same as `mem::size_of`.
    const SIZE: usize;

    /// Parses an object from a raw data.
    fn parse(data: &[u8]) -> Option<Self>;
}

impl FromData for u8 {
    const SIZE: usize = 1;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        data.first().copied()
    }
}

impl FromData for u16 {
    const SIZE: usize = 2;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        data.try_into().ok().map(u16::from_be_bytes)
    }
}

impl FromData for i16 {
    const SIZE: usize = 2;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        data.try_into().ok().map(i16::from_be_bytes)
    }
}

impl FromData for u32 {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        data.try_into().ok().map(u32::from_be_bytes)
    }
}


/// A u24 number.
///
/// Stored as u32, but encoded as 3 bytes in the font.
///
/// <https://docs.microsoft.com/en-us/typography/opentype/spec/otff#data-types>
#[derive(Clone, Copy, Debug)]
pub struct U24(pub u32);

impl FromData for U24 {
    const SIZE: usize = 3;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let data: [u8; 3] = data.try_into().ok()?;
        Some(U24(u32::from_be_bytes([0, data[0], data[1], data[2]])))
    }
}


/// A type-safe u32 offset.
#[derive(Clone, Copy, Debug)]
pub struct Offset32(pub u32);

impl Offset32 {
    /// Converts the offset to `usize`.
    #[inline]
    pub fn to_usize(&self) -> usize {
        usize::num_from(self.0)
    }
}

impl FromData for Offset32 {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        u32::parse(data).map(Offset32)
    }
}

impl FromData for Option<Offset32> {
    const SIZE: usize = Offset32::SIZE;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let offset = Offset32::parse(data)?;
        if offset.0 != 0 { Some(Some(offset)) } else { Some(None) }
    }
}


/// A safe u32 to usize casting.
///
/// Rust doesn't implement `From<u32> for usize`,
/// because it has to support 16 bit targets.
/// We don't, so we can allow this.
pub trait NumFrom<T>: Sized {
    /// Converts u32 into usize.
    fn num_from(_: T) -> Self;
}

impl NumFrom<u32> for usize {
    #[inline]
    fn num_from(v: u32) -> Self {
        #[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
        {
            v as usize
        }

        // compilation error on 16 bit targets
    }
}


/// Just like TryFrom<N>, but for numeric types not supported by the Rust's std.
pub trait TryNumFrom<T>: Sized {
    /// Casts between numeric types.
    fn try_num_from(_: T) -> Option<Self>;
}

impl TryNumFrom<usize> for u16 {
    #[inline]
    fn try_num_from(v: usize) -> Option<Self> {
        u16::try_from(v).ok()
    }
}

impl TryNumFrom<usize> for u32 {
    #[inline]
    fn try_num_from(v: usize) -> Option<Self> {
        u32::try_from(v).ok()
    }
}


/// A u16/u32 length type used by `LazyArray`.
pub trait ArraySize: Sized + Copy + PartialOrd + core::fmt::Debug {
    /// Associated 0.
    const ZERO: Self;
    /// The largest length.
    const MAX: Self;

    /// Converts the length to `usize`.
    fn to_usize(self) -> usize;

    /// Creates the length from `usize`.
    ///
    /// Returns `None` on overflow.
    fn from_usize(n: usize) -> Option<Self>;
}

impl ArraySize for u16 {
    const ZERO: Self = 0;
    const MAX: Self = u16::MAX;

    #[inline]
    fn to_usize(self) -> usize {
        usize::from(self)
    }

    #[inline]
    fn from_usize(n: usize) -> Option<Self> {
        u16::try_num_from(n)
    }
}

impl ArraySize for u32 {
    const ZERO: Self = 0;
    const MAX: Self = u32::MAX;

    #[inline]
    fn to_usize(self) -> usize {
        usize::num_from(self)
    }

    #[inline]
    fn from_usize(n: usize) -> Option<Self> {
        u32::try_num_from(n)
    }
}


/// A slice-like container that converts internal binary data only on access.
///
/// Array values are stored in a continuous data chunk.
///
/// This is the only way the crate exposes table arrays: values are decoded
/// on `get` and never copied into a temporary buffer.
#[derive(Clone, Copy)]
pub struct LazyArray<'a, T, Idx> {
    data: &'a [u8],
    data_type: core::marker::PhantomData<T>,
    len_type: core::marker::PhantomData<Idx>,
}

/// A [`LazyArray`] with a `u16` length.
pub type LazyArray16<'a, T> = LazyArray<'a, T, u16>;

/// A [`LazyArray`] with a `u32` length.
pub type LazyArray32<'a, T> = LazyArray<'a, T, u32>;

impl<T, Idx> Default for LazyArray<'_, T, Idx> {
    #[inline]
    fn default() -> Self {
        LazyArray {
            data: &[],
            data_type: core::marker::PhantomData,
            len_type: core::marker::PhantomData,
        }
    }
}

impl<'a, T: FromData, Idx: ArraySize> LazyArray<'a, T, Idx> {
    /// Creates a new `LazyArray`.
    ///
    /// Trailing bytes that do not form a whole `T` are ignored.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        let data = match T::SIZE {
            0 => &[],
            size => data.get(..data.len() - data.len() % size).unwrap_or(&[]),
        };

        LazyArray {
            data,
            data_type: core::marker::PhantomData,
            len_type: core::marker::PhantomData,
        }
    }

    /// Returns a value at `index`.
    #[inline]
    pub fn get(&self, index: Idx) -> Option<T> {
        if index >= self.len() {
            return None;
        }

        let start = index.to_usize() * T::SIZE;
        let end = start + T::SIZE;
        self.data.get(start..end).and_then(T::parse)
    }

    /// Returns array's length.
    ///
    /// Saturates on arrays longer than `Idx` can address,
    /// which can only happen with a malformed table.
    #[inline]
    pub fn len(&self) -> Idx {
        let len = self.data.len() / T::SIZE.max(1);
        Idx::from_usize(len).unwrap_or(Idx::MAX)
    }

    /// Checks if array is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == Idx::ZERO
    }

    /// Performs a binary search using specified closure.
    ///
    /// The closure must report how an array element orders
    /// relative to the searched key.
    #[inline]
    pub fn binary_search_by<F>(&self, mut f: F) -> Option<(Idx, T)>
    where
        F: FnMut(&T) -> core::cmp::Ordering,
    {
        // Based on Rust std implementation.

        use core::cmp::Ordering;

        let mut size = self.len().to_usize();
        if size == 0 {
            return None;
        }

        let mut base = 0;
        while size > 1 {
            let half = size / 2;
            let mid = base + half;
            // mid is always in [0, size), that means mid is >= 0 and < size.
            // mid >= 0: by definition
            // mid < size: mid = size / 2 + size / 4 + size / 8 ...
            let cmp = f(&self.get(Idx::from_usize(mid)?)?);
            base = if cmp == Ordering::Greater { base } else { mid };
            size -= half;
        }

        // base is always in [0, size) because base <= mid.
        let index = Idx::from_usize(base)?;
        let value = self.get(index)?;
        if f(&value) == Ordering::Equal { Some((index, value)) } else { None }
    }
}

impl<'a, T: FromData + core::fmt::Debug + Copy, Idx: ArraySize> core::fmt::Debug for LazyArray<'a, T, Idx> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_list().entries(*self).finish()
    }
}

impl<'a, T: FromData, Idx: ArraySize> IntoIterator for LazyArray<'a, T, Idx> {
    type Item = T;
    type IntoIter = LazyArrayIter<'a, T, Idx>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        LazyArrayIter {
            data: self,
            index: 0,
        }
    }
}


/// An iterator over `LazyArray`.
#[derive(Clone, Copy)]
#[allow(missing_debug_implementations)]
pub struct LazyArrayIter<'a, T, Idx> {
    data: LazyArray<'a, T, Idx>,
    index: usize,
}

impl<'a, T: FromData, Idx: ArraySize> Iterator for LazyArrayIter<'a, T, Idx> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let index = Idx::from_usize(self.index)?;
        self.index += 1;
        self.data.get(index)
    }

    #[inline]
    fn count(self) -> usize {
        self.data.len().to_usize().saturating_sub(self.index)
    }
}


/// A streaming binary parser.
#[derive(Clone, Copy, Default, Debug)]
pub struct Stream<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Stream<'a> {
    /// Creates a new `Stream` parser.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Stream { data, offset: 0 }
    }

    /// Returns the current offset.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the trailing data.
    ///
    /// Returns `None` when `Stream` is reached the end.
    #[inline]
    pub fn tail(&self) -> Option<&'a [u8]> {
        self.data.get(self.offset..)
    }

    /// Advances by `FromData::SIZE`.
    ///
    /// Doesn't check bounds.
    #[inline]
    pub fn skip<T: FromData>(&mut self) {
        self.advance(T::SIZE);
    }

    /// Advances by the specified `len`.
    ///
    /// Doesn't check bounds.
    #[inline]
    pub fn advance(&mut self, len: usize) {
        self.offset = self.offset.saturating_add(len);
    }

    /// Parses the type from the steam.
    ///
    /// Returns `None` when there is not enough data left in the stream
    /// or the type parsing failed.
    #[inline]
    pub fn read<T: FromData>(&mut self) -> Option<T> {
        self.read_bytes(T::SIZE).and_then(T::parse)
    }

    /// Parses the type from the steam at offset.
    #[inline]
    pub fn read_at<T: FromData>(data: &[u8], offset: usize) -> Option<T> {
        data.get(offset..offset.checked_add(T::SIZE)?).and_then(T::parse)
    }

    /// Reads N bytes from the stream.
    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let v = self.data.get(self.offset..self.offset.checked_add(len)?)?;
        self.advance(len);
        Some(v)
    }

    /// Reads the next `count` types as a slice.
    #[inline]
    pub fn read_array16<T: FromData>(&mut self, count: u16) -> Option<LazyArray16<'a, T>> {
        let len = usize::from(count) * T::SIZE;
        self.read_bytes(len).map(LazyArray16::new)
    }

    /// Reads the next `count` types as a slice.
    #[inline]
    pub fn read_array32<T: FromData>(&mut self, count: u32) -> Option<LazyArray32<'a, T>> {
        let len = usize::num_from(count).checked_mul(T::SIZE)?;
        self.read_bytes(len).map(LazyArray32::new)
    }
}
