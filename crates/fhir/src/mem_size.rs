use fhirbind_fhirpath_support::{PrecisionDate, PrecisionDateTime, PrecisionTime};

/// Approximate memory footprint of a value graph.
///
/// `heap_size` counts owned heap allocations (string and vector capacity,
/// boxed values); `mem_size` adds the inline size of the value itself.
pub trait MemSize {
    fn heap_size(&self) -> usize;

    fn mem_size(&self) -> usize
    where
        Self: Sized,
    {
        std::mem::size_of::<Self>() + self.heap_size()
    }
}

macro_rules! inline_only {
    ($($ty:ty),* $(,)?) => {
        $(
            impl MemSize for $ty {
                fn heap_size(&self) -> usize {
                    0
                }
            }
        )*
    };
}

inline_only!(bool, i32, u32, i64, rust_decimal::Decimal);

impl MemSize for String {
    fn heap_size(&self) -> usize {
        self.capacity()
    }
}

// The temporal types keep their source text.
impl MemSize for PrecisionDate {
    fn heap_size(&self) -> usize {
        self.as_str().len()
    }
}

impl MemSize for PrecisionTime {
    fn heap_size(&self) -> usize {
        self.as_str().len()
    }
}

impl MemSize for PrecisionDateTime {
    fn heap_size(&self) -> usize {
        self.as_str().len() + self.date().as_str().len() + self.time().map_or(0, |t| t.as_str().len())
    }
}

impl<T: MemSize> MemSize for Option<T> {
    fn heap_size(&self) -> usize {
        self.as_ref().map_or(0, MemSize::heap_size)
    }
}

impl<T: MemSize> MemSize for Vec<T> {
    fn heap_size(&self) -> usize {
        self.capacity() * std::mem::size_of::<T>() + self.iter().map(MemSize::heap_size).sum::<usize>()
    }
}

impl<T: MemSize> MemSize for Box<T> {
    fn heap_size(&self) -> usize {
        std::mem::size_of::<T>() + (**self).heap_size()
    }
}
